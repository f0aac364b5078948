//! Civil-date shifting and formatting.
//!
//! # Responsibility
//! - Parse `YYYY-MM-DD` style dates (also `/` or `.` separated).
//! - Shift by a signed day count and re-format zero-padded.
//!
//! # Invariants
//! - Arithmetic uses proleptic-Gregorian day numbers; no timezone, no
//!   clock, no date dependency.
//! - Month and day are validated against the calendar before shifting.
//! - Dates stay inside the years `0000..=9999`; a shift leaving that
//!   window is an error, never a wrap.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Date parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    UnparsableDate(String),
    ShiftOutOfRange(i64),
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnparsableDate(input) => {
                write!(f, "expected a YYYY-MM-DD style date, got: {input}")
            }
            Self::ShiftOutOfRange(days) => {
                write!(f, "shift by {days} days leaves the supported years 0000..=9999")
            }
        }
    }
}

impl Error for TimeError {}

/// Shifts a civil date by `days` and formats it with `separator`
/// (default `-`), zero-padding month and day.
///
/// Negative day counts move backwards; crossing month and year
/// boundaries, leap days included, is handled by the day-number
/// arithmetic. Shifts that land outside the years `0000..=9999` are
/// [`TimeError::ShiftOutOfRange`] errors.
pub fn shift_date(input: &str, days: i64, separator: Option<&str>) -> Result<String, TimeError> {
    let (year, month, day) = parse_civil(input)?;
    let shifted = days_from_civil(year, month, day)
        .checked_add(days)
        .filter(|day_number| (MIN_DAY_NUMBER..=MAX_DAY_NUMBER).contains(day_number))
        .ok_or(TimeError::ShiftOutOfRange(days))?;
    let (year, month, day) = civil_from_days(shifted);
    let separator = separator.unwrap_or("-");
    Ok(format!("{year:04}{separator}{month:02}{separator}{day:02}"))
}

fn parse_civil(input: &str) -> Result<(i64, u32, u32), TimeError> {
    let unparsable = || TimeError::UnparsableDate(input.to_string());
    let pieces: Vec<&str> = input
        .trim()
        .split(['-', '/', '.'])
        .filter(|piece| !piece.is_empty())
        .collect();
    if pieces.len() != 3 {
        return Err(unparsable());
    }
    let year: i64 = pieces[0].parse().map_err(|_| unparsable())?;
    let month: u32 = pieces[1].parse().map_err(|_| unparsable())?;
    let day: u32 = pieces[2].parse().map_err(|_| unparsable())?;
    if !(0..=9999).contains(&year)
        || !(1..=12).contains(&month)
        || day < 1
        || day > days_in_month(year, month)
    {
        return Err(unparsable());
    }
    Ok((year, month, day))
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

// Day-number window for the formattable years: 0000-01-01 and
// 9999-12-31 as days since the 1970-01-01 anchor.
const MIN_DAY_NUMBER: i64 = -719_528;
const MAX_DAY_NUMBER: i64 = 2_932_896;

// Day-number conversions for the proleptic Gregorian calendar, anchored
// at 1970-01-01 == day 0.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let year_of_era = year - era * 400;
    let month_prime = (i64::from(month) + 9) % 12;
    let day_of_year = (153 * month_prime + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn civil_from_days(day_number: i64) -> (i64, u32, u32) {
    let shifted = day_number + 719_468;
    let era = (if shifted >= 0 { shifted } else { shifted - 146_096 }) / 146_097;
    let day_of_era = shifted - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_prime = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * month_prime + 2) / 5 + 1) as u32;
    let month = (if month_prime < 10 { month_prime + 3 } else { month_prime - 9 }) as u32;
    let year = if month <= 2 { year + 1 } else { year };
    (year, month, day)
}

//! String trimming, whitespace splitting and `k=v` pair parsing.
//!
//! # Responsibility
//! - Strict string trim: feeding a non-string is a caller-contract error.
//! - Split on whitespace runs, preserving boundary empty segments.
//! - Parse query-string and cookie-style pair lists into object values.
//!
//! # Invariants
//! - Every parsed segment must contain a `=`; keys and values are trimmed.
//! - Empty input parses to an empty object, not an error.

use crate::value::{classify, TypeTag, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Text parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Strict string contract violation; carries the offending tag.
    NotAString(TypeTag),
    /// A pair segment without a `=` separator.
    MalformedPair(String),
}

impl Display for TextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAString(tag) => write!(f, "expected a string to trim, got: {tag}"),
            Self::MalformedPair(segment) => {
                write!(f, "pair segment has no `=` separator: {segment}")
            }
        }
    }
}

impl Error for TextError {}

/// Splits a string on runs of whitespace.
///
/// Boundary whitespace produces empty segments, matching split semantics
/// callers may rely on for positional parsing.
pub fn split_space(input: &str) -> Vec<String> {
    WHITESPACE.split(input).map(str::to_string).collect()
}

/// Trims a string value.
///
/// With `strip_all`, every whitespace character is removed; otherwise both
/// ends are trimmed. Any non-string input is a contract violation.
pub fn trim(value: &Value, strip_all: bool) -> Result<String, TextError> {
    let Value::String(text) = value else {
        return Err(TextError::NotAString(classify(value)));
    };
    if strip_all {
        Ok(WHITESPACE.replace_all(text, "").into_owned())
    } else {
        Ok(text.trim().to_string())
    }
}

/// Parses a `k=v` pair list into an object value.
///
/// `strip_leading_question` removes one leading `?` before splitting
/// (location-search strings carry it). Within a segment, only the piece
/// between the first and second `=` counts as the value.
pub fn parse_pairs(
    input: &str,
    separator: char,
    strip_leading_question: bool,
) -> Result<Value, TextError> {
    let mut entries = BTreeMap::new();
    if input.is_empty() {
        return Ok(Value::Object(entries));
    }
    let mut body = input;
    if strip_leading_question {
        body = body.strip_prefix('?').unwrap_or(body);
    }
    for segment in body.split(separator) {
        let mut pieces = segment.split('=');
        let name = pieces.next().unwrap_or_default();
        let Some(value) = pieces.next() else {
            return Err(TextError::MalformedPair(segment.to_string()));
        };
        entries.insert(name.trim().to_string(), Value::from(value.trim()));
    }
    Ok(Value::Object(entries))
}

/// Parses a location-search style query string (`&`-separated, optional
/// leading `?`). With a non-empty `key`, returns that entry or null; an
/// empty key reads as no key and returns the whole parse.
pub fn query_params(key: Option<&str>, address: &str) -> Result<Value, TextError> {
    let parsed = parse_pairs(address, '&', true)?;
    Ok(lookup(key, parsed))
}

/// Parses a cookie string (`;`-separated, optional trailing `;`). With
/// a non-empty `key`, returns that entry or null; an empty key reads as
/// no key and returns the whole parse.
pub fn cookie_params(key: Option<&str>, input: &str) -> Result<Value, TextError> {
    let body = input.strip_suffix(';').unwrap_or(input);
    let parsed = parse_pairs(body, ';', false)?;
    Ok(lookup(key, parsed))
}

fn lookup(key: Option<&str>, parsed: Value) -> Value {
    match key {
        Some(name) if !name.is_empty() => parsed.get(name).cloned().unwrap_or(Value::Null),
        _ => parsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vmap;

    #[test]
    fn split_space_collapses_runs_and_keeps_boundary_segments() {
        assert_eq!(
            split_space("aaa    bbb cc    ddd"),
            vec!["aaa", "bbb", "cc", "ddd"]
        );
        assert_eq!(split_space(" a b "), vec!["", "a", "b", ""]);
    }

    #[test]
    fn trim_strips_ends_or_everything() {
        let value = Value::String("  dsfdsa=- 234.;df  ".into());
        assert_eq!(trim(&value, false).expect("edge trim"), "dsfdsa=- 234.;df");
        let spaced = Value::String(" a b\tc ".into());
        assert_eq!(trim(&spaced, true).expect("full strip"), "abc");
    }

    #[test]
    fn trim_rejects_non_strings() {
        let err = trim(&Value::Number(3.0), false).expect_err("number must be rejected");
        assert_eq!(err, TextError::NotAString(TypeTag::Number));
        let err = trim(&Value::Null, true).expect_err("null must be rejected");
        assert_eq!(err, TextError::NotAString(TypeTag::Null));
    }

    #[test]
    fn query_params_strips_the_leading_question_mark() {
        let parsed = query_params(None, "?sfsd=3423&we=234&fsd=324").expect("query parse");
        assert_eq!(
            parsed,
            vmap! { "sfsd" => "3423", "we" => "234", "fsd" => "324" }
        );
        let one = query_params(Some("fsd"), "?sfsd=3423&we=234&fsd=324").expect("query parse");
        assert_eq!(one, Value::String("324".into()));
        let missing = query_params(Some("nope"), "a=1").expect("query parse");
        assert_eq!(missing, Value::Null);
    }

    #[test]
    fn cookie_params_drops_one_trailing_separator() {
        let parsed = cookie_params(None, "aaa=123; bbb=456;").expect("cookie parse");
        assert_eq!(parsed, vmap! { "aaa" => "123", "bbb" => "456" });
        let one = cookie_params(Some("bbb"), "aaa=123;bbb=789").expect("cookie parse");
        assert_eq!(one, Value::String("789".into()));
    }

    #[test]
    fn empty_key_reads_the_whole_parse() {
        let parsed = query_params(Some(""), "?a=1&b=2").expect("query parse");
        assert_eq!(parsed, vmap! { "a" => "1", "b" => "2" });
        let parsed = cookie_params(Some(""), "aaa=123;").expect("cookie parse");
        assert_eq!(parsed, vmap! { "aaa" => "123" });
    }

    #[test]
    fn pair_values_stop_at_the_second_equals() {
        let parsed = parse_pairs("a=b=c", '&', false).expect("pair parse");
        assert_eq!(parsed, vmap! { "a" => "b" });
    }

    #[test]
    fn malformed_pair_is_a_contract_error() {
        let err = parse_pairs("a=1&broken", '&', false).expect_err("missing `=` must fail");
        assert_eq!(err, TextError::MalformedPair("broken".to_string()));
    }

    #[test]
    fn empty_input_parses_to_an_empty_object() {
        assert_eq!(parse_pairs("", '&', true).expect("empty parse"), vmap! {});
    }
}

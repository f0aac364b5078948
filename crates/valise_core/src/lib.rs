//! Utility toolkit around one extensible namespace: type classification,
//! uniform traversal, a reference-safe deep merge and an extension kernel
//! exposing every installed function in static and chainable form.

pub mod kernel;
pub mod logging;
pub mod mvc;
pub mod text;
pub mod time;
pub mod value;

pub use kernel::namespace::{global, InstallReport, Namespace, NamespaceState};
pub use kernel::wrapped::Wrapped;
pub use kernel::{Capability, CapabilityError, CapabilityResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mvc::controller::{Action, Controller};
pub use mvc::model::Model;
pub use text::TextError;
pub use time::TimeError;
pub use value::merge::merge_into;
pub use value::traverse::{for_each, is_empty, some, sort, EntryKey, SortError, SortOrder};
pub use value::{classify, TypeTag, Value};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! SCORM 2004 runtime API core.
//! Owns the attempt data model and the rules content must follow to read and
//! write it.

pub mod api;
pub mod journal;
pub mod logging;
pub mod model;
pub mod notify;
pub mod runtime;

pub use api::{ApiReturn, DispatchError, DispatchResult, ScormApi, API_METHOD_NAMES};
pub use journal::recorder::{
    system_clock_ms, Clock, ElementJournal, JournalError, JournalResult, OutgoingBatch,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::element::TimestampedElement;
pub use model::key::{ElementKey, InteractionList};
pub use model::mode::Mode;
pub use notify::bus::{ApiEvent, EventKind, NotificationBus};
pub use runtime::config::{
    snapshot_from_pairs, AttemptConfig, LaunchError, LaunchOptions, LaunchResult, SeedElement,
    SeedSnapshot,
};
pub use runtime::counts::{InteractionCounts, ListCounts};
pub use runtime::engine::{DataModelEngine, LifecycleState, SetOutcome};

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

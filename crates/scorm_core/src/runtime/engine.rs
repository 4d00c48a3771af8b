//! Data-model engine for one attempt.
//!
//! # Responsibility
//! - Own the live key/value store, display mode, list counters and lifecycle
//!   state.
//! - Gate content reads/writes and notify subscribers of every operation.
//!
//! # Invariants
//! - No write reaches the store while `allow_set` is false, and `allow_set`
//!   is false whenever the mode is not `normal`.
//! - Every `_count` key equals the tracked counter for its list after each
//!   accepted write.
//! - Lifecycle only moves forward: uninitialized, initialized, terminated.
//! - `set_value` does not consult the lifecycle; hosts that need that gate
//!   must apply it themselves.
//!
//! # See also
//! - `crate::runtime::counts` for the counter algorithm.

use crate::api::ScormApi;
use crate::model::mode::{Mode, COMPLETED, COMPLETION_STATUS_KEY, MODE_KEY};
use crate::notify::bus::{ApiEvent, NotificationBus};
use crate::runtime::config::{AttemptConfig, LaunchOptions, SeedSnapshot};
use crate::runtime::counts::ListCounts;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt::Display;

const ERROR_STRING_PLACEHOLDER: &str = "No error description is available for this code.";
const DIAGNOSTIC_PLACEHOLDER: &str = "No diagnostic information is available for this code.";

/// Protocol lifecycle of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Terminated,
}

/// Outcome of one content write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Stored; the value differed from the previous one.
    Changed,
    /// Accepted; the value equaled the previous one.
    Unchanged,
    /// Rejected because the attempt is read-only.
    Blocked,
}

impl SetOutcome {
    /// Standardized return: `Some(true)` when performed, `None` when blocked.
    pub fn as_api_return(self) -> Option<bool> {
        match self {
            Self::Changed | Self::Unchanged => Some(true),
            Self::Blocked => None,
        }
    }
}

pub struct DataModelEngine {
    config: AttemptConfig,
    store: BTreeMap<String, String>,
    mode: Mode,
    allow_set: bool,
    counts: ListCounts,
    lifecycle: LifecycleState,
    ended: bool,
    last_error: i32,
    bus: NotificationBus,
}

impl DataModelEngine {
    /// Builds the engine from a pre-merged seed snapshot.
    ///
    /// # Side effects
    /// - Emits `initialise_data` after the store, mode and counters are set up.
    /// - Emits `initialise_api` once the engine is ready for content calls.
    pub fn new(config: AttemptConfig, seed: SeedSnapshot, bus: NotificationBus) -> Self {
        let mut engine = Self {
            config,
            store: BTreeMap::new(),
            mode: Mode::Review,
            allow_set: false,
            counts: ListCounts::new(),
            lifecycle: LifecycleState::Uninitialized,
            ended: false,
            last_error: 0,
            bus,
        };
        engine.initialise_data(seed);
        engine.initialise_api();
        engine
    }

    pub fn launch(options: LaunchOptions, bus: NotificationBus) -> Self {
        Self::new(options.config, options.scorm_cmi, bus)
    }

    fn initialise_data(&mut self, seed: SeedSnapshot) {
        self.store = seed
            .into_iter()
            .map(|(key, element)| (key, element.value))
            .collect();

        self.mode = Mode::from_stored(self.store.get(MODE_KEY).map(String::as_str));
        // A completed attempt stays read-only even if the saved mode lagged behind.
        if self.store.get(COMPLETION_STATUS_KEY).map(String::as_str) == Some(COMPLETED) {
            self.mode = Mode::Review;
            self.store.insert(MODE_KEY.to_string(), Mode::Review.as_str().to_string());
        }
        self.allow_set = self.mode.allows_set();

        let keys: Vec<String> = self.store.keys().cloned().collect();
        for key in &keys {
            self.apply_count_writes(key);
        }

        info!(
            "event=initialise_data module=engine status=ok attempt_pk={} elements={} mode={}",
            self.config.attempt_pk,
            self.store.len(),
            self.mode
        );
        self.bus.emit(&ApiEvent::InitialiseData);
    }

    fn initialise_api(&mut self) {
        info!(
            "event=initialise_api module=engine status=ok attempt_pk={}",
            self.config.attempt_pk
        );
        self.bus.emit(&ApiEvent::InitialiseApi);
    }

    fn apply_count_writes(&mut self, key: &str) {
        for write in self.counts.observe(key) {
            self.store.insert(write.key, write.value);
        }
    }

    /// Standardized facade borrowing this engine.
    pub fn api(&mut self) -> ScormApi<'_> {
        ScormApi::new(self)
    }

    /// Starts the session. Succeeds once, with an empty parameter, before
    /// termination.
    pub fn initialize(&mut self, param: &str) -> bool {
        self.bus.emit(&ApiEvent::Initialize {
            param: param.to_string(),
        });
        if !param.is_empty() || self.lifecycle != LifecycleState::Uninitialized {
            debug!(
                "event=initialize module=engine status=rejected lifecycle={:?} empty_param={}",
                self.lifecycle,
                param.is_empty()
            );
            return false;
        }
        self.lifecycle = LifecycleState::Initialized;
        debug!("event=initialize module=engine status=ok");
        true
    }

    /// Ends the session. Succeeds once, with an empty parameter, after
    /// initialization.
    pub fn terminate(&mut self, param: &str) -> bool {
        self.bus.emit(&ApiEvent::Terminate {
            param: param.to_string(),
        });
        if !param.is_empty() || self.lifecycle != LifecycleState::Initialized {
            debug!(
                "event=terminate module=engine status=rejected lifecycle={:?} empty_param={}",
                self.lifecycle,
                param.is_empty()
            );
            return false;
        }
        self.lifecycle = LifecycleState::Terminated;
        debug!("event=terminate module=engine status=ok");
        true
    }

    /// Forced shutdown: attempts a terminate, then marks the attempt ended
    /// whatever the outcome.
    pub fn end(&mut self) {
        let terminated = self.terminate("");
        self.ended = true;
        info!(
            "event=end module=engine status=ok attempt_pk={} terminated={}",
            self.config.attempt_pk, terminated
        );
    }

    pub fn get_last_error(&self) -> i32 {
        self.last_error
    }

    pub fn get_error_string(&self, _code: i32) -> &'static str {
        ERROR_STRING_PLACEHOLDER
    }

    pub fn get_diagnostic(&self, _code: i32) -> &'static str {
        DIAGNOSTIC_PLACEHOLDER
    }

    /// Returns the stored value, or `""` when nothing is recorded.
    pub fn get_value(&self, key: &str) -> &str {
        self.store.get(key).map_or("", String::as_str)
    }

    /// Writes `value` (in its string form) when the attempt is writable.
    ///
    /// # Side effects
    /// - Updates list counters when the stored value changed.
    /// - Emits `SetValue` with `(key, value, changed)` for every accepted
    ///   write, including unchanged ones. Blocked writes emit nothing.
    pub fn set_value(&mut self, key: &str, value: impl Display) -> SetOutcome {
        if !self.allow_set {
            debug!("event=set_value module=engine status=blocked key={key}");
            return SetOutcome::Blocked;
        }

        let value = value.to_string();
        let changed = self.store.get(key) != Some(&value);
        if changed {
            self.store.insert(key.to_string(), value.clone());
            self.apply_count_writes(key);
        }
        debug!("event=set_value module=engine status=ok key={key} changed={changed}");

        self.bus.emit(&ApiEvent::SetValue {
            key: key.to_string(),
            value,
            changed,
        });
        if changed {
            SetOutcome::Changed
        } else {
            SetOutcome::Unchanged
        }
    }

    /// Signals subscribers to persist. The engine itself stores nothing.
    pub fn commit(&mut self, _param: &str) -> bool {
        self.bus.emit(&ApiEvent::Commit);
        true
    }

    pub fn config(&self) -> &AttemptConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn allow_set(&self) -> bool {
        self.allow_set
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// True once `initialize` has succeeded, including after termination.
    pub fn is_initialized(&self) -> bool {
        self.lifecycle != LifecycleState::Uninitialized
    }

    pub fn is_terminated(&self) -> bool {
        self.lifecycle == LifecycleState::Terminated
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn counts(&self) -> &ListCounts {
        &self.counts
    }

    /// Read-only view of the live store.
    pub fn store(&self) -> &BTreeMap<String, String> {
        &self.store
    }

    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }
}

//! Timestamped data-model element.
//!
//! # Responsibility
//! - Capture one key/value write at a point in time for hand-off to
//!   persistence collaborators.
//!
//! # Invariants
//! - Immutable after construction.
//! - Serialized form is exactly `{key, value, time, counter}` with `time` in
//!   fractional seconds since the Unix epoch.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One element captured at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedElement {
    key: String,
    value: String,
    /// Unix epoch milliseconds.
    time_ms: i64,
    /// Caller-assigned ordering within a batch.
    counter: u64,
}

impl TimestampedElement {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        time_ms: i64,
        counter: u64,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            time_ms,
            counter,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn time_ms(&self) -> i64 {
        self.time_ms
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Capture time in fractional seconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.time_ms as f64 / 1000.0
    }
}

impl Serialize for TimestampedElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TimestampedElement", 4)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("time", &self.timestamp())?;
        state.serialize_field("counter", &self.counter)?;
        state.end()
    }
}

//! Launch options for one attempt.
//!
//! # Responsibility
//! - Deserialize the host-provided attempt configuration and seed snapshot.
//! - Coerce seed values to text at this boundary.
//!
//! # Invariants
//! - Configuration fields are stored for collaborators and never interpreted
//!   by the engine.
//! - Every seed value reaching the engine is a `String`.

use log::{error, info};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type LaunchResult<T> = Result<T, LaunchError>;

/// Errors raised while loading launch options.
#[derive(Debug)]
pub enum LaunchError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read launch options: {err}"),
            Self::Json(err) => write!(f, "invalid launch options: {err}"),
        }
    }
}

impl Error for LaunchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LaunchError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LaunchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Per-attempt configuration handed to collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptConfig {
    /// Host identifier of the attempt.
    pub attempt_pk: i64,
    /// Endpoint used by persistence collaborators when the primary channel fails.
    #[serde(default)]
    pub fallback_url: String,
    #[serde(default)]
    pub show_attempts_url: Option<String>,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub allow_review_from: Option<i64>,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub available_until: Option<i64>,
}

/// One seed entry: the reconciled current value of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedElement {
    #[serde(deserialize_with = "deserialize_text")]
    pub value: String,
}

impl SeedElement {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Pre-merged snapshot keyed by element key.
pub type SeedSnapshot = BTreeMap<String, SeedElement>;

/// Builds a snapshot from plain key/value pairs.
pub fn snapshot_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> SeedSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), SeedElement::new(value)))
        .collect()
}

/// Full launch payload: configuration plus seed snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOptions {
    #[serde(flatten)]
    pub config: AttemptConfig,
    #[serde(default)]
    pub scorm_cmi: SeedSnapshot,
}

impl LaunchOptions {
    pub fn from_json_str(raw: &str) -> LaunchResult<Self> {
        let options: Self = serde_json::from_str(raw)?;
        Ok(options)
    }

    /// Reads and parses a launch options file.
    ///
    /// # Side effects
    /// - Emits `launch_load` logging events with element count or error.
    pub fn from_path(path: impl AsRef<Path>) -> LaunchResult<Self> {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(LaunchError::from)
            .and_then(|raw| Self::from_json_str(&raw));
        match &loaded {
            Ok(options) => info!(
                "event=launch_load module=runtime status=ok attempt_pk={} elements={}",
                options.config.attempt_pk,
                options.scorm_cmi.len()
            ),
            Err(err) => error!(
                "event=launch_load module=runtime status=error path={} error={}",
                path.display(),
                err
            ),
        }
        loaded
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "seed value must be a scalar, got `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{snapshot_from_pairs, LaunchError, LaunchOptions};

    #[test]
    fn coerces_scalar_seed_values_to_text() {
        let options = LaunchOptions::from_json_str(
            r#"{
                "attempt_pk": 9,
                "scorm_cmi": {
                    "cmi.score.raw": {"value": 85},
                    "cmi.success_status": {"value": "passed"},
                    "cmi.exit": {"value": null},
                    "cmi.flag": {"value": true}
                }
            }"#,
        )
        .expect("options should parse");

        assert_eq!(options.scorm_cmi["cmi.score.raw"].value, "85");
        assert_eq!(options.scorm_cmi["cmi.success_status"].value, "passed");
        assert_eq!(options.scorm_cmi["cmi.exit"].value, "");
        assert_eq!(options.scorm_cmi["cmi.flag"].value, "true");
    }

    #[test]
    fn rejects_structured_seed_values() {
        let err = LaunchOptions::from_json_str(
            r#"{"attempt_pk": 1, "scorm_cmi": {"cmi.location": {"value": [1, 2]}}}"#,
        )
        .expect_err("array value must fail");
        assert!(matches!(err, LaunchError::Json(_)));
        assert!(err.to_string().contains("must be a scalar"));
    }

    #[test]
    fn optional_config_fields_default() {
        let options =
            LaunchOptions::from_json_str(r#"{"attempt_pk": 3}"#).expect("minimal options parse");
        assert_eq!(options.config.attempt_pk, 3);
        assert_eq!(options.config.fallback_url, "");
        assert_eq!(options.config.allow_review_from, None);
        assert_eq!(options.config.available_until, None);
        assert!(options.scorm_cmi.is_empty());
    }

    #[test]
    fn snapshot_from_pairs_wraps_values() {
        let snapshot = snapshot_from_pairs([("cmi.mode", "normal")]);
        assert_eq!(snapshot["cmi.mode"].value, "normal");
    }
}

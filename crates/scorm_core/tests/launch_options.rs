use scorm_core::{DataModelEngine, LaunchError, LaunchOptions, Mode, NotificationBus};
use std::io::Write;

const LAUNCH_JSON: &str = r#"{
    "attempt_pk": 42,
    "fallback_url": "/attempts/42/fallback",
    "show_attempts_url": "/attempts",
    "allow_review_from": 1700000000000,
    "available_until": null,
    "scorm_cmi": {
        "cmi.mode": {"value": "normal"},
        "cmi.score.raw": {"value": 72},
        "cmi.interactions.1.id": {"value": "q2"},
        "cmi.interactions.1.objectives.2.id": {"value": "obj-c"}
    }
}"#;

#[test]
fn loads_launch_options_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(LAUNCH_JSON.as_bytes())
        .expect("write launch options");

    let options = LaunchOptions::from_path(file.path()).expect("launch options should load");

    assert_eq!(options.config.attempt_pk, 42);
    assert_eq!(options.config.fallback_url, "/attempts/42/fallback");
    assert_eq!(options.config.show_attempts_url.as_deref(), Some("/attempts"));
    assert_eq!(options.config.allow_review_from, Some(1_700_000_000_000));
    assert_eq!(options.config.available_until, None);
    assert_eq!(options.scorm_cmi.len(), 4);
}

#[test]
fn launched_engine_keeps_config_and_rebuilds_counts() {
    let options = LaunchOptions::from_json_str(LAUNCH_JSON).expect("launch options parse");
    let engine = DataModelEngine::launch(options, NotificationBus::new());

    assert_eq!(engine.config().attempt_pk, 42);
    assert_eq!(engine.mode(), Mode::Normal);
    assert_eq!(engine.get_value("cmi.score.raw"), "72");
    assert_eq!(engine.get_value("cmi.interactions._count"), "2");
    assert_eq!(engine.get_value("cmi.interactions.1.objectives._count"), "3");
    assert!(engine.counts().interaction(0).is_none());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = LaunchOptions::from_path(dir.path().join("absent.json"))
        .expect_err("missing file must fail");
    assert!(matches!(err, LaunchError::Io(_)));
}

#[test]
fn malformed_json_is_json_error() {
    let err = LaunchOptions::from_json_str("{\"attempt_pk\": ").expect_err("truncated json");
    assert!(matches!(err, LaunchError::Json(_)));
    assert!(std::error::Error::source(&err).is_some());
}

//! Tests for configuration parsing and validation

use prometheus_operator::{OperatorConfig, OperatorError, Priority};
use std::time::Duration;

#[test]
fn test_config_from_json() {
    let json = r#"{
        "name": "ingest",
        "sleep_ms": 25,
        "priority": "high"
    }"#;

    let config = OperatorConfig::from_json_str(json).unwrap();
    assert_eq!(config.name, "ingest");
    assert_eq!(config.sleep(), Duration::from_millis(25));
    assert_eq!(config.priority, Priority::High);
}

#[test]
fn test_config_from_json_uses_defaults() {
    let config = OperatorConfig::from_json_str(r#"{ "name": "sparse" }"#).unwrap();
    assert_eq!(config.name, "sparse");
    assert_eq!(config.sleep_ms, 100);
    assert_eq!(config.priority, Priority::Normal);
}

#[test]
fn test_config_unknown_priority_rejected() {
    let err = OperatorConfig::from_json_str(r#"{ "name": "x", "priority": "urgent" }"#).unwrap_err();
    assert!(matches!(err, OperatorError::Parse(_)));
}

#[test]
fn test_config_negative_sleep_rejected() {
    let err = OperatorConfig::from_json_str(r#"{ "name": "x", "sleep_ms": -5 }"#).unwrap_err();
    assert!(matches!(err, OperatorError::Parse(_)));
}

#[test]
fn test_config_empty_name_rejected() {
    let err = OperatorConfig::from_json_str(r#"{ "name": "" }"#).unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: name must not be empty");
}

#[test]
fn test_config_round_trips_through_json() {
    let config = OperatorConfig::new("round-trip")
        .with_sleep_ms(0)
        .with_priority(Priority::High);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(OperatorConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_priority_parse_boundary() {
    assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
    assert!(matches!("low".parse::<Priority>(), Err(OperatorError::InvalidPriority(_))));
    assert!(matches!(Priority::try_from(2_u8), Err(OperatorError::InvalidPriority(_))));
}

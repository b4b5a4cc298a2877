//! Unit tests for sensor type tags and reading payloads.
//!
//! Run with: cargo test --test models_unit_test

use sensor_registry::error::AppError;
use sensor_registry::models::{
    SensorMetadata, SensorReading, SensorType, TemperatureReading, VelocityReading,
};
use sensor_registry::store::reading_key;

#[test]
fn type_tags_resolve_to_two_variants() {
    assert_eq!(SensorType::from_tag("Temperature").ok(), Some(SensorType::Temperature));
    assert_eq!(SensorType::from_tag("Temperatura").ok(), Some(SensorType::Temperature));
    assert_eq!(SensorType::from_tag("Velocity").ok(), Some(SensorType::Velocity));
    assert_eq!(SensorType::from_tag("Velocitat").ok(), Some(SensorType::Velocity));

    for tag in ["", "temperature", "Pressure"] {
        assert!(
            matches!(SensorType::from_tag(tag), Err(AppError::Conflict(_))),
            "tag {tag:?} should be rejected"
        );
    }
}

#[test]
fn reading_shape_selects_variant() {
    let temp: SensorReading = serde_json::from_str(
        r#"{"battery_level":80,"last_seen":"t0","temperature":21.5,"humidity":40}"#,
    )
    .unwrap();
    assert_eq!(temp.sensor_type(), SensorType::Temperature);
    assert_eq!(temp.battery_level(), 80.0);
    assert_eq!(temp.last_seen(), "t0");

    let vel: SensorReading =
        serde_json::from_str(r#"{"battery_level":50,"last_seen":"t1","velocity":3.5}"#).unwrap();
    assert_eq!(vel.sensor_type(), SensorType::Velocity);

    let incomplete = serde_json::from_str::<SensorReading>(r#"{"battery_level":50,"last_seen":"t1"}"#);
    assert!(incomplete.is_err());
}

#[test]
fn cached_json_is_flat_and_parses_by_declared_type() {
    let reading = SensorReading::Velocity(VelocityReading {
        battery_level: 12.0,
        last_seen: "t2".to_string(),
        velocity: 7.25,
    });

    let raw = reading.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["velocity"], 7.25);
    assert!(value.get("Velocity").is_none());

    assert_eq!(SensorReading::from_json(SensorType::Velocity, &raw).unwrap(), reading);
    assert!(matches!(
        SensorReading::from_json(SensorType::Temperature, &raw),
        Err(AppError::Conflict(_))
    ));
}

#[test]
fn temperature_payload_parses_as_temperature() {
    let raw = r#"{"battery_level":80.0,"last_seen":"t0","temperature":21.5,"humidity":40.0}"#;
    let parsed = SensorReading::from_json(SensorType::Temperature, raw).unwrap();
    assert_eq!(
        parsed,
        SensorReading::Temperature(TemperatureReading {
            battery_level: 80.0,
            last_seen: "t0".to_string(),
            temperature: 21.5,
            humidity: 40.0,
        })
    );
}

#[test]
fn reading_keys_are_namespaced_per_sensor() {
    assert_eq!(reading_key(1), "reading:1");
    assert_eq!(reading_key(42), "reading:42");
    assert_ne!(reading_key(1), reading_key(11));
}

#[test]
fn legacy_metadata_document_loads() {
    let raw = r#"{
        "name": "old",
        "latitude": 41.0,
        "longitude": 2.0,
        "type": "Temperatura",
        "mac_address": "00:00",
        "manufacturer": "Dummy",
        "model": "Dummy Temp",
        "serie_number": "123456789",
        "firmware_version": "1.0"
    }"#;

    let metadata: SensorMetadata = serde_json::from_str(raw).unwrap();
    assert_eq!(metadata.serial_number, "123456789");
    assert_eq!(SensorType::from_tag(&metadata.sensor_type).ok(), Some(SensorType::Temperature));
}

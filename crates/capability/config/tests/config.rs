use om_config::{ConfigError, MappingProfile};

const PROFILE: &str = r#"{
    "name": "acme-th-sensor",
    "up": {"operations": [
        {"op": "filter", "keepDeviceUplink": true},
        {"op": "extractPoints", "points": {
            "temperature": {
                "value": "{{packet.message.temperature}}",
                "eventTime": "{{time}}",
                "type": "double",
                "unitId": "Cel"
            },
            "location": {
                "eventTime": "{{time}}",
                "coordinates": ["{{packet.message.lng}}", "{{packet.message.lat}}"]
            }
        }}
    ]},
    "down": {"operations": [
        {"op": "extractDriverMessage", "commands": {"default": {"port": 2}}}
    ]}
}"#;

#[test]
fn load_profile_from_file() {
    let path = std::env::temp_dir().join(format!("om-config-{}.json", std::process::id()));
    std::fs::write(&path, PROFILE).expect("write profile");

    let profile = MappingProfile::from_path(&path).expect("profile");
    std::fs::remove_file(&path).expect("cleanup");

    assert_eq!(profile.name.as_deref(), Some("acme-th-sensor"));
    assert_eq!(profile.up.tags(), vec!["filter", "extractPoints"]);
    assert_eq!(profile.down_pipeline().operations().tags(), vec!["extractDriverMessage"]);
    assert_eq!(profile.up_pipeline().operations(), &profile.up);
}

#[test]
fn profile_encodes_back_to_same_profile() {
    let profile: MappingProfile = PROFILE.parse().expect("profile");
    let encoded = profile.to_json().expect("encode");
    let decoded: MappingProfile = encoded.parse().expect("decode");
    assert_eq!(decoded, profile);
}

#[test]
fn missing_file_is_io_error() {
    let err = MappingProfile::from_path("/nonexistent/om-profile.json").expect_err("io");
    assert!(matches!(err, ConfigError::Io(path, _) if path.ends_with("om-profile.json")));
}

#[test]
fn unknown_operation_is_invalid_section() {
    let err = "{\"down\": {\"operations\": [{\"op\": \"extractPoints\"}]}}"
        .parse::<MappingProfile>()
        .expect_err("unknown");
    assert_eq!(
        err.to_string(),
        "invalid value for down: unknown operation type: extractPoints"
    );
}

#[test]
fn extract_points_requires_event_time() {
    let err = r#"{"up": {"operations": [
        {"op": "extractPoints", "points": {"t": {"value": "{{a}}"}}}
    ]}}"#
        .parse::<MappingProfile>()
        .expect_err("eventTime");
    assert!(matches!(
        err,
        ConfigError::Invalid(field, _) if field == "up.operations[0].points.t.eventTime"
    ));
}

#[test]
fn malformed_json_is_parse_error() {
    assert!(matches!(
        "{not json".parse::<MappingProfile>(),
        Err(ConfigError::Parse(_))
    ));
}

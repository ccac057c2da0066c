use chrono::{DateTime, TimeZone, Utc};
use domain::{MessagePacket, Point, PointType, Record, UpMessage, UpMessageType};
use mapping_contract::{ExtractPoints, UpdatePoints};
use om_normalize::{NormalizeError, extract_points, update_points};
use serde_json::{Value, json};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0)
        .single()
        .expect("time")
}

fn uplink(payload: Value) -> UpMessage {
    let mut message = UpMessage::new("up-1", t0(), UpMessageType::DeviceUplink);
    message.sub_type = "measurement".to_string();
    message.packet = Some(MessagePacket {
        packet_type: "decoded".to_string(),
        raw: "0a1b".to_string(),
        message: Some(payload),
    });
    message
}

fn extract(points: Value) -> ExtractPoints {
    serde_json::from_value(json!({ "points": points })).expect("extractPoints")
}

#[test]
fn single_value_point_is_extracted() {
    let message = uplink(json!({"temperature": 22.6}));
    let operation = extract(json!({
        "temperature": {
            "value": "{{packet.message.temperature}}",
            "eventTime": "{{time}}",
            "type": "double",
            "unitId": "Cel"
        }
    }));

    let next = extract_points(&message, &operation).expect("extract");
    let points = next.points.as_ref().expect("points");
    assert_eq!(
        points["temperature"],
        Point {
            ontology_id: None,
            point_type: Some(PointType::Double),
            unit_id: Some("Cel".to_string()),
            records: vec![Record::new(t0()).with_value(json!(22.6))],
        }
    );
    // 输入消息不受影响。
    assert!(message.points.is_none());
    assert_eq!(next.id, message.id);
    assert_eq!(next.time, message.time);
    assert_eq!(next.packet, message.packet);
}

#[test]
fn array_values_pair_with_array_times() {
    let message = uplink(json!({
        "temperatures": [11.625, 11.625, 11.6875],
        "times": [
            "2021-03-04T09:58:00Z",
            "2021-03-04T09:59:00Z",
            "2021-03-04T10:00:00Z"
        ]
    }));
    let operation = extract(json!({
        "temperature": {
            "value": "{{packet.message.temperatures}}",
            "eventTime": "{{packet.message.times}}",
            "type": "double"
        }
    }));

    let next = extract_points(&message, &operation).expect("extract");
    let records = &next.points.as_ref().expect("points")["temperature"].records;
    let values: Vec<_> = records.iter().map(|r| r.value.clone()).collect();
    assert_eq!(
        values,
        vec![Some(json!(11.625)), Some(json!(11.625)), Some(json!(11.6875))]
    );
    assert_eq!(records[2].event_time, t0());
    assert!(records[0].event_time < records[1].event_time);
}

#[test]
fn nothing_matched_leaves_message_unchanged() {
    let message = uplink(json!({"other": 1}));
    let operation = extract(json!({
        "temperature": {
            "value": "{{packet.message.temperature}}",
            "eventTime": "{{packet.message.time}}"
        }
    }));

    let next = extract_points(&message, &operation).expect("extract");
    assert_eq!(next, message);
}

#[test]
fn value_and_time_lengths_must_match() {
    let message = uplink(json!({
        "values": [1, 2],
        "times": ["2021-03-04T10:00:00Z", "2021-03-04T10:01:00Z", "2021-03-04T10:02:00Z"]
    }));
    let operation = extract(json!({
        "counter": {
            "value": "{{packet.message.values}}",
            "eventTime": "{{packet.message.times}}"
        }
    }));

    let err = extract_points(&message, &operation).expect_err("cardinality");
    assert_eq!(
        err,
        NormalizeError::Cardinality("value/eventTime mismatch for counter".to_string())
    );
}

#[test]
fn value_without_time_is_cardinality_error() {
    let message = uplink(json!({"temperature": 20.0}));
    let operation = extract(json!({
        "temperature": {
            "value": "{{packet.message.temperature}}",
            "eventTime": "{{packet.message.missing}}"
        }
    }));

    let err = extract_points(&message, &operation).expect_err("cardinality");
    assert_eq!(
        err,
        NormalizeError::Cardinality("value/eventTime mismatch for temperature".to_string())
    );
}

#[test]
fn nothing_matched_keeps_existing_point() {
    let mut message = uplink(json!({"humidity": 40}));
    let existing = Point {
        ontology_id: None,
        point_type: Some(PointType::Double),
        unit_id: None,
        records: vec![Record::new(t0()).with_value(json!(19.0))],
    };
    message.points = Some([("temperature".to_string(), existing.clone())].into());

    let operation = extract(json!({
        "temperature": {
            "value": "{{packet.message.temperature}}",
            "eventTime": "{{packet.message.missing}}"
        }
    }));
    let next = extract_points(&message, &operation).expect("extract");
    assert_eq!(next.points.expect("points")["temperature"], existing);
}

#[test]
fn empty_points_mapping_stays_empty() {
    let mut message = uplink(json!({}));
    message.points = Some(Default::default());
    let operation = extract(json!({
        "temperature": {"value": "{{packet.message.temperature}}", "eventTime": "{{time}}"}
    }));
    let next = extract_points(&message, &operation).expect("extract");
    assert_eq!(next.points, Some(Default::default()));
}

#[test]
fn extract_then_update_rewrites_unit_and_value() {
    let message = uplink(json!({"reading": {"raw": 215, "scale": "deci"}}));
    let extract_op = extract(json!({
        "temperature": {
            "value": "{{packet.message.reading}}",
            "eventTime": "{{time}}",
            "type": "object"
        }
    }));
    let extracted = extract_points(&message, &extract_op).expect("extract");

    let update_op: UpdatePoints = serde_json::from_value(json!({
        "points": {"temperature": {"value": "{{raw}}", "type": "int64", "unitId": "dCel"}}
    }))
    .expect("updatePoints");
    let updated = update_points(&extracted, &update_op).expect("update");

    let point = &updated.points.as_ref().expect("points")["temperature"];
    assert_eq!(point.point_type, Some(PointType::Int64));
    assert_eq!(point.unit_id.as_deref(), Some("dCel"));
    assert_eq!(point.records, vec![Record::new(t0()).with_value(json!(215))]);
}

#[test]
fn empty_raw_frame_is_extracted_as_empty_string() {
    let mut message = uplink(json!({}));
    if let Some(packet) = message.packet.as_mut() {
        packet.raw = String::new();
    }
    let operation = extract(json!({
        "frame": {"value": "{{packet.raw}}", "eventTime": "{{time}}", "type": "string"}
    }));
    let next = extract_points(&message, &operation).expect("extract");
    let points = next.points.expect("points");
    assert_eq!(points["frame"].records[0].value, Some(json!("")));
}

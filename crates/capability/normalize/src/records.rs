use crate::NormalizeError;
use chrono::{DateTime, Utc};
use domain::Record;
use serde_json::Value;

/// 数组化：数组原样展开，其他存在的值包装为单元素列表，缺省为空列表。
pub fn normalize_list(value: Option<Value>) -> Vec<Value> {
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

/// 坐标分量输入（已数组化）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateInputs {
    pub longitudes: Vec<Value>,
    pub latitudes: Vec<Value>,
    pub altitudes: Vec<Value>,
    /// 是否声明了海拔分量。
    pub altitude_declared: bool,
}

/// 记录构建输入。
///
/// `values` 为 `None` 表示未声明 value；`coordinates` 为 `None` 表示未声明坐标。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordInputs {
    pub values: Option<Vec<Value>>,
    pub event_times: Vec<Value>,
    pub coordinates: Option<CoordinateInputs>,
}

impl RecordInputs {
    fn value_list(&self) -> &[Value] {
        self.values.as_deref().unwrap_or_default()
    }

    fn longitude_list(&self) -> &[Value] {
        self.coordinates
            .as_ref()
            .map(|coords| coords.longitudes.as_slice())
            .unwrap_or_default()
    }
}

/// 校验基数并构建记录列表。
///
/// eventTime 为空，或 value 与经度均为空时返回空列表。
pub fn build_records(point: &str, inputs: &RecordInputs) -> Result<Vec<Record>, NormalizeError> {
    check_cardinality(point, inputs)?;

    let values = inputs.value_list();
    let longitudes = inputs.longitude_list();
    if inputs.event_times.is_empty() || (values.is_empty() && longitudes.is_empty()) {
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(inputs.event_times.len());
    for (index, raw_time) in inputs.event_times.iter().enumerate() {
        let mut record = Record::new(parse_event_time(point, raw_time)?);
        if !values.is_empty() {
            record.value = match component(values, index, point)? {
                Value::Null => None,
                value => Some(value.clone()),
            };
        }
        if let Some(coords) = inputs.coordinates.as_ref().filter(|c| !c.longitudes.is_empty()) {
            let mut components = vec![
                parse_number(point, component(&coords.longitudes, index, point)?)?,
                parse_number(point, component(&coords.latitudes, index, point)?)?,
            ];
            if !coords.altitudes.is_empty() {
                components.push(parse_number(
                    point,
                    component(&coords.altitudes, index, point)?,
                )?);
            }
            record.coordinates = Some(components);
        }
        records.push(record);
    }
    Ok(records)
}

fn check_cardinality(point: &str, inputs: &RecordInputs) -> Result<(), NormalizeError> {
    let times = inputs.event_times.len();
    if let Some(values) = &inputs.values {
        if !values.is_empty() && values.len() != times {
            return Err(NormalizeError::Cardinality(format!(
                "value/eventTime mismatch for {point}"
            )));
        }
    }
    if let Some(coords) = &inputs.coordinates {
        let longitudes = coords.longitudes.len();
        if longitudes > 0 && longitudes != times {
            return Err(NormalizeError::Cardinality(format!(
                "coordinates/eventTime mismatch for {point}"
            )));
        }
        if longitudes != coords.latitudes.len()
            || (coords.altitude_declared && longitudes != coords.altitudes.len())
        {
            return Err(NormalizeError::Cardinality(format!(
                "latitude/longitude/altitude mismatch for {point}"
            )));
        }
    }
    if let (Some(values), Some(coords)) = (&inputs.values, &inputs.coordinates) {
        if values.len() != coords.longitudes.len() {
            return Err(NormalizeError::Cardinality(format!(
                "value/coordinates mismatch for {point}"
            )));
        }
    }
    Ok(())
}

fn component<'a>(list: &'a [Value], index: usize, point: &str) -> Result<&'a Value, NormalizeError> {
    list.get(index).ok_or_else(|| {
        NormalizeError::Cardinality(format!(
            "latitude/longitude/altitude mismatch for {point}"
        ))
    })
}

fn parse_event_time(point: &str, raw: &Value) -> Result<DateTime<Utc>, NormalizeError> {
    let Value::String(text) = raw else {
        return Err(NormalizeError::TimeParse(format!(
            "eventTime of {point} is not a timestamp: {raw}"
        )));
    };
    DateTime::parse_from_rfc3339(text)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|err| NormalizeError::TimeParse(format!("eventTime of {point} ({text}): {err}")))
}

fn parse_number(point: &str, raw: &Value) -> Result<f64, NormalizeError> {
    match raw {
        Value::Number(number) => number.as_f64().ok_or_else(|| {
            NormalizeError::NumericParse(format!("coordinate of {point} out of range: {number}"))
        }),
        Value::String(text) => text.trim().parse::<f64>().map_err(|err| {
            NormalizeError::NumericParse(format!("coordinate of {point} ({text}): {err}"))
        }),
        other => Err(NormalizeError::NumericParse(format!(
            "coordinate of {point} is not a number: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn times(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| json!(format!("2021-03-04T10:0{i}:00Z")))
            .collect()
    }

    #[test]
    fn normalize_list_wraps_scalars() {
        assert!(normalize_list(None).is_empty());
        assert_eq!(normalize_list(Some(json!(1))), vec![json!(1)]);
        assert_eq!(normalize_list(Some(json!([1, 2]))), vec![json!(1), json!(2)]);
        assert_eq!(normalize_list(Some(json!({"a": 1}))), vec![json!({"a": 1})]);
    }

    #[test]
    fn value_records_pair_by_index() {
        let inputs = RecordInputs {
            values: Some(vec![json!(1), json!(null), json!("x")]),
            event_times: times(3),
            coordinates: None,
        };
        let records = build_records("p", &inputs).expect("records");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value, Some(json!(1)));
        assert_eq!(records[1].value, None);
        assert_eq!(records[2].value, Some(json!("x")));
        assert!(records.iter().all(|r| r.coordinates.is_none()));
        assert!(records[0].event_time < records[2].event_time);
    }

    #[test]
    fn coordinate_records_coerce_numeric_strings() {
        let inputs = RecordInputs {
            values: None,
            event_times: times(1),
            coordinates: Some(CoordinateInputs {
                longitudes: vec![json!("2.35")],
                latitudes: vec![json!(48.85)],
                altitudes: vec![json!(35)],
                altitude_declared: true,
            }),
        };
        let records = build_records("loc", &inputs).expect("records");
        assert_eq!(records[0].coordinates, Some(vec![2.35, 48.85, 35.0]));
        assert!(records[0].value.is_none());
    }

    #[test]
    fn value_with_coordinates_in_one_record() {
        let inputs = RecordInputs {
            values: Some(vec![json!(7)]),
            event_times: times(1),
            coordinates: Some(CoordinateInputs {
                longitudes: vec![json!(1.0)],
                latitudes: vec![json!(2.0)],
                ..CoordinateInputs::default()
            }),
        };
        let records = build_records("p", &inputs).expect("records");
        assert_eq!(records[0].value, Some(json!(7)));
        assert_eq!(records[0].coordinates, Some(vec![1.0, 2.0]));
    }

    #[test]
    fn empty_event_times_or_empty_payload_yield_nothing() {
        let no_time = RecordInputs {
            values: Some(Vec::new()),
            event_times: Vec::new(),
            coordinates: None,
        };
        assert!(build_records("p", &no_time).expect("ok").is_empty());

        let no_payload = RecordInputs {
            values: Some(Vec::new()),
            event_times: times(1),
            coordinates: None,
        };
        assert!(build_records("p", &no_payload).expect("ok").is_empty());
    }

    #[test]
    fn value_time_mismatch_names_point() {
        let inputs = RecordInputs {
            values: Some(vec![json!(1), json!(2)]),
            event_times: times(3),
            coordinates: None,
        };
        let err = build_records("temperature", &inputs).expect_err("mismatch");
        assert_eq!(
            err,
            NormalizeError::Cardinality("value/eventTime mismatch for temperature".to_string())
        );
    }

    #[test]
    fn coordinate_mismatches_are_reported_in_order() {
        let against_time = RecordInputs {
            values: None,
            event_times: times(1),
            coordinates: Some(CoordinateInputs {
                longitudes: vec![json!(1), json!(2)],
                latitudes: vec![json!(1), json!(2)],
                ..CoordinateInputs::default()
            }),
        };
        assert_eq!(
            build_records("gps", &against_time).expect_err("mismatch").to_string(),
            "cardinality error: coordinates/eventTime mismatch for gps"
        );

        let components = RecordInputs {
            values: None,
            event_times: times(1),
            coordinates: Some(CoordinateInputs {
                longitudes: vec![json!(1)],
                latitudes: vec![json!(1)],
                altitudes: Vec::new(),
                altitude_declared: true,
            }),
        };
        assert_eq!(
            build_records("gps", &components).expect_err("mismatch").to_string(),
            "cardinality error: latitude/longitude/altitude mismatch for gps"
        );
    }

    #[test]
    fn value_without_coordinates_is_rejected_when_both_declared() {
        let inputs = RecordInputs {
            values: Some(vec![json!(1)]),
            event_times: times(1),
            coordinates: Some(CoordinateInputs::default()),
        };
        assert_eq!(
            build_records("p", &inputs).expect_err("mismatch").to_string(),
            "cardinality error: value/coordinates mismatch for p"
        );
    }

    #[test]
    fn bad_time_and_coordinate_are_typed_errors() {
        let bad_time = RecordInputs {
            values: Some(vec![json!(1)]),
            event_times: vec![json!("yesterday")],
            coordinates: None,
        };
        assert!(matches!(
            build_records("p", &bad_time),
            Err(NormalizeError::TimeParse(_))
        ));

        let bad_number = RecordInputs {
            values: None,
            event_times: times(1),
            coordinates: Some(CoordinateInputs {
                longitudes: vec![json!("east")],
                latitudes: vec![json!(1)],
                ..CoordinateInputs::default()
            }),
        };
        assert!(matches!(
            build_records("p", &bad_number),
            Err(NormalizeError::NumericParse(_))
        ));
    }
}

use crate::NormalizeError;
use crate::records::{CoordinateInputs, RecordInputs, build_records, normalize_list};
use domain::{Point, UpMessage};
use mapping_contract::{ExtractPoints, PointSpec};
use om_expression::Expression;
use serde_json::Value;
use tracing::debug;

/// 按点位表达式从整条上行消息中抽取点位。
///
/// 抽取不到记录的点位不会删除已有同名点位；原本缺省的点位集合在无抽取结果时保持缺省。
pub fn extract_points(
    message: &UpMessage,
    operation: &ExtractPoints,
) -> Result<UpMessage, NormalizeError> {
    let context =
        serde_json::to_value(message).map_err(|err| NormalizeError::Encode(err.to_string()))?;
    let mut points = message.points.clone().unwrap_or_default();
    let mut extracted = 0usize;

    for (name, spec) in &operation.points {
        let inputs = collect_inputs(name, spec, &context)?;
        let records = build_records(name, &inputs)?;
        if records.is_empty() {
            debug!(target: "om.normalize", point = %name, "point_skipped");
            continue;
        }
        debug!(
            target: "om.normalize",
            point = %name,
            records = records.len(),
            "point_extracted"
        );
        points.insert(
            name.clone(),
            Point {
                ontology_id: spec.ontology_id.clone(),
                point_type: spec.point_type,
                unit_id: spec.unit_id.clone(),
                records,
            },
        );
        extracted += 1;
    }

    let mut next = message.clone();
    if extracted > 0 {
        next.points = Some(points);
    }
    Ok(next)
}

fn collect_inputs(
    name: &str,
    spec: &PointSpec,
    context: &Value,
) -> Result<RecordInputs, NormalizeError> {
    let values = match spec.value.as_deref().filter(|text| !text.is_empty()) {
        Some(text) => Some(evaluate_list(text, context)?),
        None => None,
    };
    let event_times = evaluate_list(&spec.event_time, context)?;
    let coordinates = match &spec.coordinates {
        Some(expressions) => Some(collect_coordinates(name, expressions, context)?),
        None => None,
    };
    Ok(RecordInputs {
        values,
        event_times,
        coordinates,
    })
}

fn collect_coordinates(
    name: &str,
    expressions: &[String],
    context: &Value,
) -> Result<CoordinateInputs, NormalizeError> {
    let (longitude, latitude, altitude) = match expressions {
        [longitude, latitude] => (longitude, latitude, None),
        [longitude, latitude, altitude] => (longitude, latitude, Some(altitude)),
        _ => {
            return Err(NormalizeError::Type(format!(
                "coordinates must hold 2 or 3 expressions for {name}"
            )));
        }
    };
    let altitudes = match altitude {
        Some(text) => evaluate_list(text, context)?,
        None => Vec::new(),
    };
    Ok(CoordinateInputs {
        longitudes: evaluate_list(longitude, context)?,
        latitudes: evaluate_list(latitude, context)?,
        altitudes,
        altitude_declared: altitude.is_some(),
    })
}

fn evaluate_list(text: &str, context: &Value) -> Result<Vec<Value>, NormalizeError> {
    Ok(normalize_list(Expression::classify(text).evaluate(context)?))
}

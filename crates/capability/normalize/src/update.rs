use crate::NormalizeError;
use crate::records::{CoordinateInputs, RecordInputs, build_records};
use chrono::SecondsFormat;
use domain::{Point, Record, UpMessage};
use mapping_contract::{PointUpdateSpec, UpdatePoints};
use om_expression::Expression;
use serde_json::Value;
use tracing::debug;

/// 字段级改写规则，分类一次后用于每条记录。
struct FieldRule(Expression);

impl FieldRule {
    fn new(text: Option<&str>) -> Self {
        Self(Expression::classify_optional(text))
    }

    /// 缺省保留原值，字面量直接替换，模板以原值为上下文求值。
    fn apply(&self, prior: Value) -> Result<Value, NormalizeError> {
        match &self.0 {
            Expression::Absent => Ok(prior),
            Expression::Literal(text) => Ok(Value::String(text.clone())),
            Expression::Template(_) => Ok(self.0.evaluate(&prior)?.unwrap_or(Value::Null)),
        }
    }
}

/// 以已有记录为上下文重算点位。
///
/// 只处理消息与配置中同时存在的点位；重算不出记录的点位被移除。
pub fn update_points(
    message: &UpMessage,
    operation: &UpdatePoints,
) -> Result<UpMessage, NormalizeError> {
    let Some(existing) = &message.points else {
        return Ok(message.clone());
    };

    let mut points = existing.clone();
    for (name, spec) in &operation.points {
        let Some(prior) = existing.get(name) else {
            continue;
        };
        let inputs = collect_inputs(name, spec, &prior.records)?;
        let records = build_records(name, &inputs)?;
        if records.is_empty() {
            debug!(target: "om.normalize", point = %name, "point_removed");
            points.remove(name);
            continue;
        }
        debug!(
            target: "om.normalize",
            point = %name,
            records = records.len(),
            "point_updated"
        );
        points.insert(
            name.clone(),
            Point {
                ontology_id: override_text(spec.ontology_id.as_deref(), &prior.ontology_id),
                point_type: spec.point_type.or(prior.point_type),
                unit_id: override_text(spec.unit_id.as_deref(), &prior.unit_id),
                records,
            },
        );
    }

    let mut next = message.clone();
    next.points = Some(points);
    Ok(next)
}

fn collect_inputs(
    name: &str,
    spec: &PointUpdateSpec,
    records: &[Record],
) -> Result<RecordInputs, NormalizeError> {
    let value_rule = FieldRule::new(spec.value.as_deref());
    let time_rule = FieldRule::new(spec.event_time.as_deref());
    let coordinate_rules = match spec.coordinates.as_deref() {
        None => None,
        Some(expressions @ ([_, _] | [_, _, _])) => Some(
            expressions
                .iter()
                .map(|text| FieldRule::new(Some(text)))
                .collect::<Vec<_>>(),
        ),
        Some(_) => {
            return Err(NormalizeError::Type(format!(
                "coordinates must hold 2 or 3 expressions for {name}"
            )));
        }
    };

    let mut values = Vec::new();
    let mut event_times = Vec::with_capacity(records.len());
    let mut coordinates = CoordinateInputs::default();
    let mut value_declared = false;
    let mut coordinates_declared = false;

    for record in records {
        if let Some(prior) = &record.value {
            values.push(value_rule.apply(prior.clone())?);
            value_declared = true;
        }

        let prior_time = record.event_time.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        event_times.push(time_rule.apply(Value::String(prior_time))?);

        let Some(components) = record.coordinates.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        coordinates_declared = true;
        let prior_component = |index: usize| {
            components
                .get(index)
                .copied()
                .map_or(Value::Null, Value::from)
        };
        match &coordinate_rules {
            Some(rules) => {
                coordinates.longitudes.push(rules[0].apply(prior_component(0))?);
                coordinates.latitudes.push(rules[1].apply(prior_component(1))?);
                if let Some(rule) = rules.get(2) {
                    coordinates.altitudes.push(rule.apply(prior_component(2))?);
                    coordinates.altitude_declared = true;
                }
            }
            None => {
                coordinates.longitudes.push(prior_component(0));
                coordinates.latitudes.push(prior_component(1));
                if components.len() == 3 {
                    coordinates.altitudes.push(prior_component(2));
                    coordinates.altitude_declared = true;
                }
            }
        }
    }

    Ok(RecordInputs {
        values: value_declared.then_some(values),
        event_times,
        coordinates: coordinates_declared.then_some(coordinates),
    })
}

fn override_text(candidate: Option<&str>, prior: &Option<String>) -> Option<String> {
    match candidate {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => prior.clone(),
    }
}

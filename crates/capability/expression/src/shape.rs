//! Shape 渲染：递归遍历模板 JSON 树，解析其中的模板叶子。

use crate::ExpressionError;
use crate::template::Expression;
use serde_json::{Map, Value};

/// 渲染严格度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// 根节点必须渲染为对象（驱动报文）。
    Message,
    /// 根节点可以是任意值（命令输入）。
    Command,
}

/// 以指定模式渲染 Shape。
pub fn render(shape: &Value, context: &Value, mode: RenderMode) -> Result<Value, ExpressionError> {
    match mode {
        RenderMode::Message => render_message(shape, context),
        RenderMode::Command => render_command(shape, context),
    }
}

/// 报文抽取模式。
pub fn render_message(shape: &Value, context: &Value) -> Result<Value, ExpressionError> {
    match shape {
        Value::Object(fields) => render_fields(fields, context),
        Value::String(text) => match Expression::classify(text) {
            Expression::Template(query) => match crate::template::search(&query, context)? {
                Some(value @ Value::Object(_)) => Ok(value),
                _ => Err(ExpressionError::Type(
                    "expected object for message but returned value node or null".to_string(),
                )),
            },
            _ => Err(value_node_error()),
        },
        _ => Err(value_node_error()),
    }
}

/// 命令抽取模式：非模板、非对象的根节点按字面量透传。
pub fn render_command(shape: &Value, context: &Value) -> Result<Value, ExpressionError> {
    match shape {
        Value::Object(fields) => render_fields(fields, context),
        Value::String(text) => match Expression::classify(text) {
            Expression::Template(query) => crate::template::search(&query, context)?.ok_or_else(
                || ExpressionError::Type("retrieved value is null or not a map".to_string()),
            ),
            _ => Ok(shape.clone()),
        },
        other => Ok(other.clone()),
    }
}

fn render_fields(fields: &Map<String, Value>, context: &Value) -> Result<Value, ExpressionError> {
    let mut rendered = Map::with_capacity(fields.len());
    for (key, element) in fields {
        let value = match element {
            Value::Object(nested) => render_fields(nested, context)?,
            Value::String(text) => match Expression::classify(text) {
                Expression::Template(query) => crate::template::search(&query, context)?
                    .ok_or_else(|| {
                        ExpressionError::Type(format!(
                            "nothing could be extracted from expression {key}"
                        ))
                    })?,
                _ => element.clone(),
            },
            other => other.clone(),
        };
        rendered.insert(key.clone(), value);
    }
    Ok(Value::Object(rendered))
}

fn value_node_error() -> ExpressionError {
    ExpressionError::Type("expected object but is a value node".to_string())
}

use crate::ExpressionError;
use crate::functions::runtime;
use serde_json::Value;
use tracing::trace;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// 表达式字符串的分类结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `{{ ... }}` 模板，保存去掉标记后的查询语句。
    Template(String),
    /// 非空且不含模板标记的字面量。
    Literal(String),
    /// 空字符串或未配置。
    Absent,
}

impl Expression {
    /// 对表达式字符串做一次性分类。
    pub fn classify(text: &str) -> Self {
        if is_template(text) {
            Expression::Template(text.replace(OPEN, "").replace(CLOSE, ""))
        } else if text.is_empty() {
            Expression::Absent
        } else {
            Expression::Literal(text.to_string())
        }
    }

    pub fn classify_optional(text: Option<&str>) -> Self {
        text.map(Self::classify).unwrap_or(Expression::Absent)
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Expression::Template(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Expression::Absent)
    }

    /// 对上下文求值。只有模板会进入查询引擎，字面量与缺省均返回 `None`。
    pub fn evaluate(&self, context: &Value) -> Result<Option<Value>, ExpressionError> {
        match self {
            Expression::Template(query) => search(query, context),
            Expression::Literal(_) | Expression::Absent => Ok(None),
        }
    }
}

/// 同时包含 `{{` 与 `}}` 即视为模板。
pub fn is_template(text: &str) -> bool {
    text.contains(OPEN) && text.contains(CLOSE)
}

/// 分类并求值。
pub fn evaluate(text: &str, context: &Value) -> Result<Option<Value>, ExpressionError> {
    Expression::classify(text).evaluate(context)
}

/// 在带扩展函数的运行时上执行 JMESPath 查询；匹配结果为 null 时返回 `None`。
pub fn search(query: &str, context: &Value) -> Result<Option<Value>, ExpressionError> {
    let compiled = runtime()
        .compile(query)
        .map_err(|err| ExpressionError::Syntax(err.to_string()))?;
    let result = compiled
        .search(context)
        .map_err(|err| ExpressionError::Syntax(err.to_string()))?;
    if result.is_null() {
        trace!(target: "om.expression", query = %query, matched = false, "template_evaluated");
        return Ok(None);
    }
    let value =
        serde_json::to_value(&*result).map_err(|err| ExpressionError::Syntax(err.to_string()))?;
    trace!(target: "om.expression", query = %query, matched = true, "template_evaluated");
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_splits_template_literal_absent() {
        assert_eq!(
            Expression::classify("{{packet.message.temperature}}"),
            Expression::Template("packet.message.temperature".to_string())
        );
        assert_eq!(
            Expression::classify("Cel"),
            Expression::Literal("Cel".to_string())
        );
        assert_eq!(Expression::classify(""), Expression::Absent);
        assert_eq!(Expression::classify_optional(None), Expression::Absent);
        // 只有开标记不算模板。
        assert_eq!(
            Expression::classify("{{time"),
            Expression::Literal("{{time".to_string())
        );
    }

    #[test]
    fn template_matches_context() {
        let context = json!({"packet": {"message": {"temperature": 22.6}}});
        let value = evaluate("{{packet.message.temperature}}", &context).expect("evaluate");
        assert_eq!(value, Some(json!(22.6)));
    }

    #[test]
    fn template_without_match_is_absent() {
        let context = json!({"packet": {"message": {}}});
        let value = evaluate("{{packet.message.humidity}}", &context).expect("evaluate");
        assert!(value.is_none());
    }

    #[test]
    fn literal_is_never_searched() {
        let context = json!({"time": "2020-01-01T10:00:00Z"});
        assert!(evaluate("time", &context).expect("evaluate").is_none());
        assert!(evaluate("", &context).expect("evaluate").is_none());
    }

    #[test]
    fn malformed_query_is_syntax_error() {
        let err = evaluate("{{packet.[}}", &json!({})).expect_err("syntax");
        assert!(matches!(err, ExpressionError::Syntax(_)));
    }

    #[test]
    fn current_node_template_reads_scalar_context() {
        let value = evaluate("{{@}}", &json!(7.5)).expect("evaluate");
        assert_eq!(value, Some(json!(7.5)));
    }
}

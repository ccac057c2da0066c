//! 模板可调用的扩展函数。
//!
//! 在 JMESPath 内置函数之外注册：
//! - `to_boolean(value)`：布尔、数字（非零为真）、`"true"`/`"false"` 及数字字符串转布尔，其余为 null
//! - `date_time_op(time, '+'|'-', amount, unit)`：对 RFC3339 时间加减，单位 `ms`/`s`/`m`/`h`/`d`
//! - `add_property(object, key, value)`：返回写入一个字段后的对象副本

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use jmespath::functions::{ArgumentType, CustomFunction, Signature};
use jmespath::{Context, ErrorReason, JmespathError, Rcvar, Runtime, RuntimeError, Variable};
use lazy_static::lazy_static;

type FunctionResult = Result<Rcvar, JmespathError>;

lazy_static! {
    static ref RUNTIME: Runtime = {
        let mut runtime = Runtime::new();
        runtime.register_builtin_functions();
        runtime.register_function(
            "to_boolean",
            Box::new(CustomFunction::new(
                Signature::new(vec![ArgumentType::Any], None),
                Box::new(to_boolean),
            )),
        );
        runtime.register_function(
            "date_time_op",
            Box::new(CustomFunction::new(
                Signature::new(
                    vec![
                        ArgumentType::Union(vec![ArgumentType::String, ArgumentType::Null]),
                        ArgumentType::String,
                        ArgumentType::Union(vec![
                            ArgumentType::Number,
                            ArgumentType::String,
                            ArgumentType::Null,
                        ]),
                        ArgumentType::String,
                    ],
                    None,
                ),
                Box::new(date_time_op),
            )),
        );
        runtime.register_function(
            "add_property",
            Box::new(CustomFunction::new(
                Signature::new(
                    vec![
                        ArgumentType::Union(vec![ArgumentType::Object, ArgumentType::Null]),
                        ArgumentType::String,
                        ArgumentType::Any,
                    ],
                    None,
                ),
                Box::new(add_property),
            )),
        );
        runtime
    };
}

/// 带扩展函数的共享运行时。
pub fn runtime() -> &'static Runtime {
    &RUNTIME
}

fn to_boolean(args: &[Rcvar], _ctx: &mut Context<'_>) -> FunctionResult {
    let flag = match &*args[0] {
        Variable::Bool(flag) => Some(*flag),
        Variable::Number(number) => number.as_f64().map(|n| n != 0.0),
        Variable::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            other => other.parse::<f64>().ok().map(|n| n != 0.0),
        },
        _ => None,
    };
    Ok(Rcvar::new(flag.map_or(Variable::Null, Variable::Bool)))
}

fn date_time_op(args: &[Rcvar], ctx: &mut Context<'_>) -> FunctionResult {
    let (Some(time), Some(amount)) = (args[0].as_string(), amount_of(&args[2])) else {
        return Ok(Rcvar::new(Variable::Null));
    };
    let time = DateTime::parse_from_rfc3339(time)
        .map_err(|_| invalid(ctx, 0, "RFC3339 timestamp", &args[0]))?
        .with_timezone(&Utc);

    let unit_ms = match args[3].as_string().map(String::as_str) {
        Some("ms") => 1.0,
        Some("s") => 1_000.0,
        Some("m") => 60_000.0,
        Some("h") => 3_600_000.0,
        Some("d") => 86_400_000.0,
        _ => return Err(invalid(ctx, 3, "ms|s|m|h|d", &args[3])),
    };
    let delta = TimeDelta::try_milliseconds((amount * unit_ms).round() as i64)
        .ok_or_else(|| invalid(ctx, 2, "duration in range", &args[2]))?;
    let shifted = match args[1].as_string().map(String::as_str) {
        Some("+") => time.checked_add_signed(delta),
        Some("-") => time.checked_sub_signed(delta),
        _ => return Err(invalid(ctx, 1, "'+' or '-'", &args[1])),
    }
    .ok_or_else(|| invalid(ctx, 2, "duration in range", &args[2]))?;

    Ok(Rcvar::new(Variable::String(
        shifted.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    )))
}

/// 数字或数字字符串；其余视为缺失。
fn amount_of(value: &Rcvar) -> Option<f64> {
    match &**value {
        Variable::Number(number) => number.as_f64(),
        Variable::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn add_property(args: &[Rcvar], _ctx: &mut Context<'_>) -> FunctionResult {
    let mut fields = args[0].as_object().cloned().unwrap_or_default();
    if let Some(key) = args[1].as_string() {
        fields.insert(key.clone(), args[2].clone());
    }
    Ok(Rcvar::new(Variable::Object(fields)))
}

fn invalid(ctx: &Context<'_>, position: usize, expected: &str, actual: &Rcvar) -> JmespathError {
    JmespathError::from_ctx(
        ctx,
        ErrorReason::Runtime(RuntimeError::InvalidType {
            expected: expected.to_string(),
            actual: actual.get_type().to_string(),
            position,
        }),
    )
}

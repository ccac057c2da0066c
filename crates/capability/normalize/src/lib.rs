//! # 点位规范化能力模块
//!
//! 把设备上报中结构松散、可能为数组的字段转换为经过基数校验的时序记录。
//!
//! - [`build_records`]：数组化输入的基数校验与记录构建
//! - [`extract_points`]：以整条消息为上下文抽取点位
//! - [`update_points`]：以已有记录字段为上下文重算点位

mod extract;
mod records;
mod update;

pub use extract::extract_points;
pub use records::{CoordinateInputs, RecordInputs, build_records, normalize_list};
pub use update::update_points;

use om_expression::ExpressionError;

/// 规范化错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("cardinality error: {0}")]
    Cardinality(String),
    #[error("time parse error: {0}")]
    TimeParse(String),
    #[error("numeric parse error: {0}")]
    NumericParse(String),
    #[error("type error: {0}")]
    Type(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

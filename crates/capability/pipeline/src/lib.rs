//! # 操作流水线能力模块
//!
//! 按顺序把上行 / 下行操作分发到对应处理器：
//!
//! ```text
//! message ──▶ op[0] ──▶ op[1] ──▶ ... ──▶ message'
//!               │ None      │ Err
//!               ▼           ▼
//!             丢弃         中止
//! ```
//!
//! 上行与下行是两张互不相交的分发表（[`UpOperationHandler`] / [`DownOperationHandler`]）。

mod command;
mod filter;
mod handler;
mod pipeline;

pub use command::{extract_driver_message, update_command};
pub use filter::{filter, filter_points};
pub use handler::{DownOperationHandler, UpOperationHandler};
pub use pipeline::{DownPipeline, UpPipeline, apply_down, apply_up};

use mapping_contract::ContractError;
use om_expression::ExpressionError;
use om_normalize::NormalizeError;

/// Pipeline 处理错误。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error("encode error: {0}")]
    Encode(String),
}

/// 调用方可匹配的稳定错误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownOperationType,
    Decode,
    Encode,
    Cardinality,
    Type,
    TimeParse,
    NumericParse,
    ExpressionSyntax,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Contract(ContractError::UnknownOperationType(_)) => {
                ErrorKind::UnknownOperationType
            }
            PipelineError::Contract(ContractError::Decode(_)) => ErrorKind::Decode,
            PipelineError::Contract(ContractError::Encode(_)) => ErrorKind::Encode,
            PipelineError::Normalize(err) => match err {
                NormalizeError::Cardinality(_) => ErrorKind::Cardinality,
                NormalizeError::TimeParse(_) => ErrorKind::TimeParse,
                NormalizeError::NumericParse(_) => ErrorKind::NumericParse,
                NormalizeError::Type(_) => ErrorKind::Type,
                NormalizeError::Encode(_) => ErrorKind::Encode,
                NormalizeError::Expression(inner) => expression_kind(inner),
            },
            PipelineError::Expression(err) => expression_kind(err),
            PipelineError::Encode(_) => ErrorKind::Encode,
        }
    }
}

fn expression_kind(err: &ExpressionError) -> ErrorKind {
    match err {
        ExpressionError::Syntax(_) => ErrorKind::ExpressionSyntax,
        ExpressionError::Type(_) => ErrorKind::Type,
    }
}

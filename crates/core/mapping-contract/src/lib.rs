//! 映射操作的稳定配置契约。
//!
//! 线上格式：`{"operations": [ {"op": "<tag>", ...}, ... ]}`。
//!
//! | 方向 | 判别值 | 载荷 |
//! |------|--------|------|
//! | 上行 | `extractPoints` | [`ExtractPoints`] |
//! | 上行 | `updatePoints` | [`UpdatePoints`] |
//! | 上行 | `filter` | [`Filter`] |
//! | 上行 | `filterPoints` | [`FilterPoints`] |
//! | 下行 | `extractDriverMessage` | [`ExtractDriverMessage`] |
//! | 下行 | `updateCommand` | [`UpdateCommand`] |

mod operation;
mod spec;

pub use operation::{
    DownOperation, DownOperations, OPERATION_TAG, Operations, TaggedOperation, UpOperation,
    UpOperations,
};
pub use spec::{
    CommandUpdate, ExtractDriverMessage, ExtractPoints, Filter, FilterPoints, PointSpec,
    PointUpdateSpec, UpdateCommand, UpdatePoints,
};

/// 命令映射中的兜底键。
pub const DEFAULT_COMMAND: &str = "default";

/// 契约编解码错误。
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("unknown operation type: {0}")]
    UnknownOperationType(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
}

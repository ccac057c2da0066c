//! 处理器契约：每个操作载荷只实现其所属方向的 trait。

use crate::PipelineError;
use crate::command::{extract_driver_message, update_command};
use crate::filter::{filter, filter_points};
use domain::{DownMessage, UpMessage};
use mapping_contract::{
    DownOperation, ExtractDriverMessage, ExtractPoints, Filter, FilterPoints, UpOperation,
    UpdateCommand, UpdatePoints,
};
use om_normalize::{extract_points, update_points};

/// 上行处理器：返回新消息，`None` 表示消息被丢弃。
pub trait UpOperationHandler {
    fn apply_up(&self, message: &UpMessage) -> Result<Option<UpMessage>, PipelineError>;
}

/// 下行处理器。
pub trait DownOperationHandler {
    fn apply_down(&self, message: &DownMessage) -> Result<Option<DownMessage>, PipelineError>;
}

impl UpOperationHandler for ExtractPoints {
    fn apply_up(&self, message: &UpMessage) -> Result<Option<UpMessage>, PipelineError> {
        Ok(Some(extract_points(message, self)?))
    }
}

impl UpOperationHandler for UpdatePoints {
    fn apply_up(&self, message: &UpMessage) -> Result<Option<UpMessage>, PipelineError> {
        Ok(Some(update_points(message, self)?))
    }
}

impl UpOperationHandler for Filter {
    fn apply_up(&self, message: &UpMessage) -> Result<Option<UpMessage>, PipelineError> {
        Ok(filter(message, self))
    }
}

impl UpOperationHandler for FilterPoints {
    fn apply_up(&self, message: &UpMessage) -> Result<Option<UpMessage>, PipelineError> {
        Ok(Some(filter_points(message, self)))
    }
}

impl DownOperationHandler for ExtractDriverMessage {
    fn apply_down(&self, message: &DownMessage) -> Result<Option<DownMessage>, PipelineError> {
        extract_driver_message(message, self).map(Some)
    }
}

impl DownOperationHandler for UpdateCommand {
    fn apply_down(&self, message: &DownMessage) -> Result<Option<DownMessage>, PipelineError> {
        update_command(message, self).map(Some)
    }
}

/// 上行分发表。
impl UpOperationHandler for UpOperation {
    fn apply_up(&self, message: &UpMessage) -> Result<Option<UpMessage>, PipelineError> {
        match self {
            UpOperation::ExtractPoints(op) => op.apply_up(message),
            UpOperation::UpdatePoints(op) => op.apply_up(message),
            UpOperation::Filter(op) => op.apply_up(message),
            UpOperation::FilterPoints(op) => op.apply_up(message),
        }
    }
}

/// 下行分发表。
impl DownOperationHandler for DownOperation {
    fn apply_down(&self, message: &DownMessage) -> Result<Option<DownMessage>, PipelineError> {
        match self {
            DownOperation::ExtractDriverMessage(op) => op.apply_down(message),
            DownOperation::UpdateCommand(op) => op.apply_down(message),
        }
    }
}

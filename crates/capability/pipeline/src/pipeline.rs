use crate::PipelineError;
use crate::handler::{DownOperationHandler, UpOperationHandler};
use domain::{DownMessage, UpMessage};
use mapping_contract::{DownOperations, TaggedOperation, UpOperations};
use tracing::{debug, warn};

/// 依次执行上行操作。输入缺省或任一步返回缺省时结果为缺省，任一步出错即中止。
pub fn apply_up(
    message: Option<&UpMessage>,
    operations: &UpOperations,
) -> Result<Option<UpMessage>, PipelineError> {
    run(
        "up",
        message,
        &operations.operations,
        |message| message.id.as_str(),
        |operation, message| operation.apply_up(message),
    )
}

/// 依次执行下行操作，语义同 [`apply_up`]。
pub fn apply_down(
    message: Option<&DownMessage>,
    operations: &DownOperations,
) -> Result<Option<DownMessage>, PipelineError> {
    run(
        "down",
        message,
        &operations.operations,
        |message| message.id.as_str(),
        |operation, message| operation.apply_down(message),
    )
}

/// 两个方向共用的执行循环，日志事件名相同，以 `direction` 区分。
fn run<M, O>(
    direction: &'static str,
    message: Option<&M>,
    operations: &[O],
    message_id: impl Fn(&M) -> &str,
    apply: impl Fn(&O, &M) -> Result<Option<M>, PipelineError>,
) -> Result<Option<M>, PipelineError>
where
    M: Clone,
    O: TaggedOperation,
{
    let Some(message) = message else {
        return Ok(None);
    };
    let mut current = message.clone();
    for (step, operation) in operations.iter().enumerate() {
        match apply(operation, &current) {
            Ok(Some(next)) => {
                debug!(
                    target: "om.pipeline",
                    direction,
                    step,
                    op = operation.tag(),
                    message_id = message_id(&current),
                    "operation_applied"
                );
                current = next;
            }
            Ok(None) => {
                debug!(
                    target: "om.pipeline",
                    direction,
                    step,
                    op = operation.tag(),
                    message_id = message_id(&current),
                    "message_dropped"
                );
                return Ok(None);
            }
            Err(err) => {
                warn!(
                    target: "om.pipeline",
                    direction,
                    step,
                    op = operation.tag(),
                    message_id = message_id(&current),
                    error = %err,
                    "operation_failed"
                );
                return Err(err);
            }
        }
    }
    Ok(Some(current))
}

/// 已解析的上行流水线，可跨线程共享。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpPipeline {
    operations: UpOperations,
}

impl UpPipeline {
    pub fn new(operations: UpOperations) -> Self {
        Self { operations }
    }

    pub fn from_json(text: &str) -> Result<Self, PipelineError> {
        Ok(Self::new(UpOperations::from_json(text)?))
    }

    pub fn operations(&self) -> &UpOperations {
        &self.operations
    }

    pub fn apply(&self, message: Option<&UpMessage>) -> Result<Option<UpMessage>, PipelineError> {
        apply_up(message, &self.operations)
    }
}

/// 已解析的下行流水线。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownPipeline {
    operations: DownOperations,
}

impl DownPipeline {
    pub fn new(operations: DownOperations) -> Self {
        Self { operations }
    }

    pub fn from_json(text: &str) -> Result<Self, PipelineError> {
        Ok(Self::new(DownOperations::from_json(text)?))
    }

    pub fn operations(&self) -> &DownOperations {
        &self.operations
    }

    pub fn apply(
        &self,
        message: Option<&DownMessage>,
    ) -> Result<Option<DownMessage>, PipelineError> {
        apply_down(message, &self.operations)
    }
}

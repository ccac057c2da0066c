use domain::{DownMessage, UpMessage};
use om_config::MappingProfile;
use om_pipeline::PipelineError;
use std::str::FromStr;
use tracing::info;

/// 映射方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = MapperError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(MapperError::Usage(format!(
                "direction must be up or down, got {other}"
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("invalid message: {0}")]
    Message(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// 对一条 JSON 消息执行配置中对应方向的流水线，返回输出 JSON（被丢弃时为 `null`）。
pub fn map_message(
    profile: &MappingProfile,
    direction: Direction,
    input: &str,
) -> Result<String, MapperError> {
    let output = match direction {
        Direction::Up => {
            let message: UpMessage = serde_json::from_str(input)
                .map_err(|err| MapperError::Message(err.to_string()))?;
            let result = profile.up_pipeline().apply(Some(&message))?;
            info!(
                target: "om.pipeline",
                message_id = %message.id,
                kept = result.is_some(),
                "up_message_mapped"
            );
            serde_json::to_string_pretty(&result)
        }
        Direction::Down => {
            let message: DownMessage = serde_json::from_str(input)
                .map_err(|err| MapperError::Message(err.to_string()))?;
            let result = profile.down_pipeline().apply(Some(&message))?;
            info!(
                target: "om.pipeline",
                message_id = %message.id,
                kept = result.is_some(),
                "down_message_mapped"
            );
            serde_json::to_string_pretty(&result)
        }
    };
    output.map_err(|err| MapperError::Message(err.to_string()))
}

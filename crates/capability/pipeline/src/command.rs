use crate::PipelineError;
use domain::{DownMessage, MessagePacket};
use mapping_contract::{DEFAULT_COMMAND, ExtractDriverMessage, UpdateCommand};
use om_expression::{render_command, render_message};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

/// 先按命令 id 查找，找不到时回落到 `default`。
fn lookup<'a, T>(
    entries: &'a BTreeMap<String, T>,
    command_id: Option<&str>,
) -> Option<(&'a str, &'a T)> {
    command_id
        .and_then(|id| entries.get_key_value(id))
        .or_else(|| entries.get_key_value(DEFAULT_COMMAND))
        .map(|(key, entry)| (key.as_str(), entry))
}

/// 以整条下行消息为上下文渲染驱动报文，写入 `packet.message`。
pub fn extract_driver_message(
    message: &DownMessage,
    operation: &ExtractDriverMessage,
) -> Result<DownMessage, PipelineError> {
    let command_id = message.command.as_ref().map(|command| command.id.as_str());
    let Some((key, shape)) = lookup(&operation.commands, command_id) else {
        return Ok(message.clone());
    };

    let context =
        serde_json::to_value(message).map_err(|err| PipelineError::Encode(err.to_string()))?;
    let rendered = render_message(shape, &context)?;
    debug!(target: "om.pipeline", entry = %key, "driver_message_rendered");

    let mut next = message.clone();
    next.packet
        .get_or_insert_with(MessagePacket::default)
        .message = Some(rendered);
    Ok(next)
}

/// 改写命令 id 与输入；消息不带命令时原样返回。
pub fn update_command(
    message: &DownMessage,
    operation: &UpdateCommand,
) -> Result<DownMessage, PipelineError> {
    let Some(command) = &message.command else {
        return Ok(message.clone());
    };
    let Some((key, update)) = lookup(&operation.commands, Some(command.id.as_str())) else {
        return Ok(message.clone());
    };

    let mut next_command = command.clone();
    if let Some(shape) = &update.input {
        let context = json!({"id": command.id, "input": command.input});
        next_command.input = Some(render_command(shape, &context)?);
    }
    if let Some(id) = update.id.as_deref().filter(|id| !id.is_empty()) {
        next_command.id = id.to_string();
    }
    debug!(
        target: "om.pipeline",
        entry = %key,
        command_id = %next_command.id,
        "command_updated"
    );

    let mut next = message.clone();
    next.command = Some(next_command);
    Ok(next)
}

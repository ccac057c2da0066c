use crate::data::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 点位集合：名称 -> 点位。
pub type Points = BTreeMap<String, Point>;

/// 上行消息类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpMessageType {
    DeviceUplink,
    DeviceDownlinkSent,
    DeviceLocation,
    DeviceNotification,
}

/// 下行消息类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DownMessageType {
    DeviceDownlink,
}

/// 消息来源。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    #[serde(rename = "type")]
    pub origin_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub time: DateTime<Utc>,
}

/// 账户标识（子账户 / 订阅者）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub realm_id: String,
}

/// 设备型号或应用的模块描述。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    pub producer_id: String,
    pub module_id: String,
    pub version: String,
}

/// 设备（Thing）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModuleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<ModuleSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Thing {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            model: None,
            application: None,
            tags: Vec::new(),
        }
    }
}

/// 报文：类型标签、十六进制原始帧、解码后的消息体。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePacket {
    #[serde(rename = "type", default)]
    pub packet_type: String,
    /// 空串也输出，模板 `{{packet.raw}}` 才能取到 `""`。
    #[serde(default)]
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

/// 下行命令。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

/// 上行消息（设备 -> 平台）。
///
/// `points` 为 `None` 与 `Some(空集合)` 语义不同，处理器必须区分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpMessage {
    #[serde(default)]
    pub id: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(rename = "type")]
    pub message_type: UpMessageType,
    #[serde(default)]
    pub sub_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing: Option<Thing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Points>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<MessagePacket>,
}

impl UpMessage {
    /// 构造仅含身份字段的上行消息，其余字段由调用方填充。
    pub fn new(id: impl Into<String>, time: DateTime<Utc>, message_type: UpMessageType) -> Self {
        Self {
            id: id.into(),
            time,
            content: None,
            message_type,
            sub_type: String::new(),
            origin: None,
            sub_account: None,
            subscriber: None,
            thing: None,
            points: None,
            packet: None,
        }
    }
}

/// 下行消息（平台 -> 设备）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownMessage {
    #[serde(default)]
    pub id: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub message_type: DownMessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing: Option<Thing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<MessagePacket>,
}

impl DownMessage {
    pub fn new(id: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            time,
            message_type: DownMessageType::DeviceDownlink,
            content: None,
            origin: None,
            command: None,
            sub_account: None,
            subscriber: None,
            thing: None,
            packet: None,
        }
    }
}

//! 各操作变体的配置载荷。

use domain::PointType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 从消息中抽取一个点位的表达式集合。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub event_time: String,
    /// 经度、纬度、[海拔] 表达式，长度为 2 或 3。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<PointType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
}

/// 对已有点位的更新规则：缺省字段保持原值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointUpdateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<PointType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractPoints {
    #[serde(default)]
    pub points: BTreeMap<String, PointSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePoints {
    #[serde(default)]
    pub points: BTreeMap<String, PointUpdateSpec>,
}

/// 按消息类型保留或丢弃上行消息。
///
/// `keep_device_notification_sub_types` 为 `None`（未配置）与 `Some(vec![])` 语义不同。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub keep_device_uplink: bool,
    #[serde(default)]
    pub keep_device_downlink_sent: bool,
    #[serde(default)]
    pub keep_device_location: bool,
    #[serde(default)]
    pub keep_device_notification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_device_notification_sub_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPoints {
    #[serde(default)]
    pub points: Vec<String>,
}

/// 命令 id（或 `default`）-> Shape。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractDriverMessage {
    #[serde(default)]
    pub commands: BTreeMap<String, Value>,
}

/// 单个命令的改写规则。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCommand {
    #[serde(default)]
    pub commands: BTreeMap<String, CommandUpdate>,
}

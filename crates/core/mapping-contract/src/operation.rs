//! 操作的带标签联合类型与编解码。
//!
//! 解码时先读取判别字段 `op`，再把整个对象解析为对应变体的载荷，
//! 从不根据载荷形状推断变体。

use crate::ContractError;
use crate::spec::{
    ExtractDriverMessage, ExtractPoints, Filter, FilterPoints, UpdateCommand, UpdatePoints,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 判别字段名。
pub const OPERATION_TAG: &str = "op";

/// 带判别字段的操作变体。
pub trait TaggedOperation: Sized {
    /// 当前变体对应的判别值。
    fn tag(&self) -> &'static str;

    /// 从 JSON 对象解码。
    fn from_value(value: Value) -> Result<Self, ContractError>;
}

/// 上行操作。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op")]
pub enum UpOperation {
    #[serde(rename = "extractPoints")]
    ExtractPoints(ExtractPoints),
    #[serde(rename = "updatePoints")]
    UpdatePoints(UpdatePoints),
    #[serde(rename = "filter")]
    Filter(Filter),
    #[serde(rename = "filterPoints")]
    FilterPoints(FilterPoints),
}

impl TaggedOperation for UpOperation {
    fn tag(&self) -> &'static str {
        match self {
            UpOperation::ExtractPoints(_) => "extractPoints",
            UpOperation::UpdatePoints(_) => "updatePoints",
            UpOperation::Filter(_) => "filter",
            UpOperation::FilterPoints(_) => "filterPoints",
        }
    }

    fn from_value(value: Value) -> Result<Self, ContractError> {
        let tag = read_tag(&value)?;
        match tag.as_str() {
            "extractPoints" => decode(value).map(UpOperation::ExtractPoints),
            "updatePoints" => decode(value).map(UpOperation::UpdatePoints),
            "filter" => decode(value).map(UpOperation::Filter),
            "filterPoints" => decode(value).map(UpOperation::FilterPoints),
            _ => Err(ContractError::UnknownOperationType(tag)),
        }
    }
}

/// 下行操作。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op")]
pub enum DownOperation {
    #[serde(rename = "extractDriverMessage")]
    ExtractDriverMessage(ExtractDriverMessage),
    #[serde(rename = "updateCommand")]
    UpdateCommand(UpdateCommand),
}

impl TaggedOperation for DownOperation {
    fn tag(&self) -> &'static str {
        match self {
            DownOperation::ExtractDriverMessage(_) => "extractDriverMessage",
            DownOperation::UpdateCommand(_) => "updateCommand",
        }
    }

    fn from_value(value: Value) -> Result<Self, ContractError> {
        let tag = read_tag(&value)?;
        match tag.as_str() {
            "extractDriverMessage" => decode(value).map(DownOperation::ExtractDriverMessage),
            "updateCommand" => decode(value).map(DownOperation::UpdateCommand),
            _ => Err(ContractError::UnknownOperationType(tag)),
        }
    }
}

impl<'de> Deserialize<'de> for UpOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        UpOperation::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for DownOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        DownOperation::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// 有序操作列表，线上格式为 `{"operations": [ ... ]}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Operations<T> {
    #[serde(default = "Vec::new")]
    pub operations: Vec<T>,
}

/// 上行流水线配置。
pub type UpOperations = Operations<UpOperation>;
/// 下行流水线配置。
pub type DownOperations = Operations<DownOperation>;

impl<T> Default for Operations<T> {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
        }
    }
}

impl<T> Operations<T> {
    pub fn new(operations: Vec<T>) -> Self {
        Self { operations }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

impl<T: TaggedOperation> Operations<T> {
    /// 从 JSON 对象解码；未知判别值返回 `UnknownOperationType`。
    pub fn from_value(value: Value) -> Result<Self, ContractError> {
        let Value::Object(mut fields) = value else {
            return Err(ContractError::Decode(
                "expected object with an operations array".to_string(),
            ));
        };
        let operations = match fields.remove("operations") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(T::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ContractError::Decode(
                    "operations must be an array".to_string(),
                ));
            }
        };
        Ok(Self { operations })
    }

    pub fn from_json(text: &str) -> Result<Self, ContractError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| ContractError::Decode(err.to_string()))?;
        Self::from_value(value)
    }

    /// 各操作的判别值（按顺序）。
    pub fn tags(&self) -> Vec<&'static str> {
        self.operations.iter().map(T::tag).collect()
    }
}

impl<T: Serialize> Operations<T> {
    pub fn to_value(&self) -> Result<Value, ContractError> {
        serde_json::to_value(self).map_err(|err| ContractError::Encode(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ContractError> {
        serde_json::to_string(self).map_err(|err| ContractError::Encode(err.to_string()))
    }
}

fn read_tag(value: &Value) -> Result<String, ContractError> {
    match value.get(OPERATION_TAG) {
        Some(Value::String(tag)) => Ok(tag.clone()),
        Some(other) => Err(ContractError::UnknownOperationType(other.to_string())),
        None => Err(ContractError::UnknownOperationType(
            "<missing op>".to_string(),
        )),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ContractError> {
    serde_json::from_value(value).map_err(|err| ContractError::Decode(err.to_string()))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 点位值的数据类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    String,
    Int64,
    Double,
    Obix,
    Xml,
    Boolean,
    Object,
}

impl PointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::String => "string",
            PointType::Int64 => "int64",
            PointType::Double => "double",
            PointType::Obix => "obix",
            PointType::Xml => "xml",
            PointType::Boolean => "boolean",
            PointType::Object => "object",
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知点位类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPointType(pub String);

impl fmt::Display for UnknownPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown point type: {}", self.0)
    }
}

impl std::error::Error for UnknownPointType {}

impl FromStr for PointType {
    type Err = UnknownPointType;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "string" => Ok(PointType::String),
            "int64" => Ok(PointType::Int64),
            "double" => Ok(PointType::Double),
            "obix" => Ok(PointType::Obix),
            "xml" => Ok(PointType::Xml),
            "boolean" => Ok(PointType::Boolean),
            "object" => Ok(PointType::Object),
            other => Err(UnknownPointType(other.to_string())),
        }
    }
}

/// 单条时序观测记录。
///
/// `coordinates` 存在时长度为 2 或 3：经度、纬度、[海拔]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<f64>>,
    pub event_time: DateTime<Utc>,
}

impl Record {
    pub fn new(event_time: DateTime<Utc>) -> Self {
        Self {
            value: None,
            coordinates: None,
            event_time,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_coordinates(mut self, coordinates: Vec<f64>) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

/// 规范化后的点位：一个具名信号及其有序记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<PointType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub records: Vec<Record>,
}

//! 映射配置（mapping profile）加载与校验。
//!
//! 配置文件格式：
//!
//! ```json
//! {
//!   "name": "acme-sensor",
//!   "up": {"operations": [ ... ]},
//!   "down": {"operations": [ ... ]}
//! }
//! ```
//!
//! `up` / `down` 缺省时视为空流水线。

use mapping_contract::{DownOperation, DownOperations, TaggedOperation, UpOperation, UpOperations};
use om_pipeline::{DownPipeline, UpPipeline};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(String, String),
    #[error("malformed profile: {0}")]
    Parse(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("failed to encode profile: {0}")]
    Encode(String),
}

/// 一个设备型号的上行 / 下行映射配置。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingProfile {
    pub name: Option<String>,
    pub up: UpOperations,
    pub down: DownOperations,
}

impl MappingProfile {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::from_value(value)
    }

    /// 从 JSON 值解析并校验。
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(mut fields) = value else {
            return Err(ConfigError::Parse("profile must be a JSON object".to_string()));
        };
        let name = match fields.remove("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                return Err(ConfigError::Invalid(
                    "name".to_string(),
                    format!("expected string, got {other}"),
                ));
            }
        };
        let up = match fields.remove("up") {
            None | Some(Value::Null) => UpOperations::default(),
            Some(section) => UpOperations::from_value(section)
                .map_err(|err| ConfigError::Invalid("up".to_string(), err.to_string()))?,
        };
        let down = match fields.remove("down") {
            None | Some(Value::Null) => DownOperations::default(),
            Some(section) => DownOperations::from_value(section)
                .map_err(|err| ConfigError::Invalid("down".to_string(), err.to_string()))?,
        };

        let profile = Self { name, up, down };
        profile.validate()?;
        info!(
            target: "om.config",
            name = profile.name.as_deref().unwrap_or("<unnamed>"),
            up_operations = profile.up.len(),
            down_operations = profile.down.len(),
            "mapping_profile_loaded"
        );
        Ok(profile)
    }

    /// 从文件读取。
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|err| ConfigError::Io(path.display().to_string(), err.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// 校验解码阶段无法表达的约束。
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, operation) in self.up.operations.iter().enumerate() {
            let prefix = format!("up.operations[{index}]");
            validate_up(&prefix, operation)?;
        }
        for (index, operation) in self.down.operations.iter().enumerate() {
            let prefix = format!("down.operations[{index}]");
            validate_down(&prefix, operation)?;
        }
        Ok(())
    }

    pub fn up_pipeline(&self) -> UpPipeline {
        UpPipeline::new(self.up.clone())
    }

    pub fn down_pipeline(&self) -> DownPipeline {
        DownPipeline::new(self.down.clone())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        let mut fields = serde_json::Map::new();
        if let Some(name) = &self.name {
            fields.insert("name".to_string(), Value::String(name.clone()));
        }
        let encode = |err: mapping_contract::ContractError| ConfigError::Encode(err.to_string());
        fields.insert("up".to_string(), self.up.to_value().map_err(encode)?);
        fields.insert("down".to_string(), self.down.to_value().map_err(encode)?);
        serde_json::to_string_pretty(&Value::Object(fields))
            .map_err(|err| ConfigError::Encode(err.to_string()))
    }
}

impl FromStr for MappingProfile {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_slice(text.as_bytes())
    }
}

fn validate_up(prefix: &str, operation: &UpOperation) -> Result<(), ConfigError> {
    let tag = operation.tag();
    match operation {
        UpOperation::ExtractPoints(extract) => {
            for (name, spec) in &extract.points {
                require_name(prefix, tag, name)?;
                let field = format!("{prefix}.points.{name}");
                if spec.event_time.is_empty() {
                    return Err(ConfigError::Invalid(
                        format!("{field}.eventTime"),
                        "eventTime expression is required".to_string(),
                    ));
                }
                check_coordinates(&field, spec.coordinates.as_deref())?;
            }
        }
        UpOperation::UpdatePoints(update) => {
            for (name, spec) in &update.points {
                require_name(prefix, tag, name)?;
                let field = format!("{prefix}.points.{name}");
                check_coordinates(&field, spec.coordinates.as_deref())?;
            }
        }
        UpOperation::FilterPoints(filter) => {
            for name in &filter.points {
                require_name(prefix, tag, name)?;
            }
        }
        UpOperation::Filter(_) => {}
    }
    Ok(())
}

fn validate_down(prefix: &str, operation: &DownOperation) -> Result<(), ConfigError> {
    let tag = operation.tag();
    let keys: Vec<&String> = match operation {
        DownOperation::ExtractDriverMessage(extract) => extract.commands.keys().collect(),
        DownOperation::UpdateCommand(update) => update.commands.keys().collect(),
    };
    for key in keys {
        if key.is_empty() {
            return Err(ConfigError::Invalid(
                format!("{prefix}.commands"),
                format!("{tag} command key must not be empty"),
            ));
        }
    }
    Ok(())
}

fn require_name(prefix: &str, tag: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid(
            format!("{prefix}.points"),
            format!("{tag} point name must not be empty"),
        ));
    }
    Ok(())
}

fn check_coordinates(field: &str, coordinates: Option<&[String]>) -> Result<(), ConfigError> {
    match coordinates {
        Some(list) if !(2..=3).contains(&list.len()) => Err(ConfigError::Invalid(
            format!("{field}.coordinates"),
            format!("expected 2 or 3 expressions, got {}", list.len()),
        )),
        _ => Ok(()),
    }
}

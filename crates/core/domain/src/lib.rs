//! 设备消息模型：上行遥测、下行命令及规范化点位。

pub mod data;
pub mod message;

pub use data::{Point, PointType, Record, UnknownPointType};
pub use message::{
    Account, Command, DownMessage, DownMessageType, MessagePacket, ModuleSpec, Origin, Points,
    Thing, UpMessage, UpMessageType,
};

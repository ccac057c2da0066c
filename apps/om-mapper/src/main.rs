//! 映射命令行：对单条消息执行映射配置中的上行 / 下行流水线。
//!
//! ```text
//! om-mapper <profile.json> <up|down> [message.json]
//! ```
//!
//! 未给出消息文件时从标准输入读取；结果写到标准输出，消息被丢弃时输出 `null`。

mod mapper;

use mapper::{Direction, MapperError, map_message};
use om_config::MappingProfile;
use om_telemetry::init_tracing;
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化结构化日志（RUST_LOG 控制级别）
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(profile_path), Some(direction)) = (args.next(), args.next()) else {
        return Err(MapperError::Usage(
            "om-mapper <profile.json> <up|down> [message.json]".to_string(),
        )
        .into());
    };
    let direction: Direction = direction.parse()?;
    let profile = MappingProfile::from_path(&profile_path)?;

    let input = match args.next() {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    println!("{}", map_message(&profile, direction, &input)?);
    Ok(())
}

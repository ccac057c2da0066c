//! 追踪初始化与日志 target 约定。
//!
//! 引擎本身只发出 `tracing` 事件，从不安装订阅器；由宿主进程调用 [`init_tracing`]。

use tracing_subscriber::{EnvFilter, fmt};

/// 流水线分发事件。
pub const TARGET_PIPELINE: &str = "om.pipeline";
/// 点位抽取 / 更新事件。
pub const TARGET_NORMALIZE: &str = "om.normalize";
/// 单个模板求值事件（trace 级）。
pub const TARGET_EXPRESSION: &str = "om.expression";
/// 映射配置加载事件。
pub const TARGET_CONFIG: &str = "om.config";

pub const ENGINE_TARGETS: [&str; 4] = [
    TARGET_PIPELINE,
    TARGET_NORMALIZE,
    TARGET_EXPRESSION,
    TARGET_CONFIG,
];

/// 为所有引擎 target 生成同一级别的过滤指令，例如 `om.pipeline=debug,...`。
pub fn engine_directives(level: &str) -> String {
    ENGINE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    init_tracing_with("info");
}

/// 以指定默认指令初始化 tracing；`RUST_LOG` 存在时优先。
///
/// 返回是否由本次调用完成安装（重复调用返回 `false`）。
pub fn init_tracing_with(default_directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).try_init().is_ok()
}

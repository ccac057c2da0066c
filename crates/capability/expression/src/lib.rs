//! # 模板表达式能力模块
//!
//! - **Expression**：把字符串分类为模板 / 字面量 / 缺省，模板以 JMESPath 对 JSON 上下文求值
//! - **Shape**：递归渲染模板 JSON 树（报文抽取模式、命令抽取模式）
//! - **functions**：`to_boolean`、`date_time_op`、`add_property` 扩展函数
//!
//! ```text
//! "{{packet.message.temperature}}"  ──classify──▶ Template("packet.message.temperature")
//!                                                   │
//!                                      runtime().compile + search(context)
//!                                                   │
//!                                          Some(value) / None（无匹配）
//! ```

mod functions;
mod shape;
mod template;

pub use functions::runtime;
pub use shape::{RenderMode, render, render_command, render_message};
pub use template::{Expression, evaluate, is_template, search};

/// 表达式求值错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// 查询语法错误或查询引擎运行时错误（原样透出）
    #[error("expression syntax error: {0}")]
    Syntax(String),

    /// Shape / 表达式约定被违反（例如期望对象）
    #[error("type error: {0}")]
    Type(String),
}

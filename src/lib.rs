//! Block Render Engine - 声明式区块渲染引擎
//! 将 JSON 区块树与分层数据上下文解释为渲染树（框架无关）

// 错误与诊断
pub mod error;

// 渲染配置
pub mod config;

// 事件分发表
pub mod event;

// 区块 schema / 绑定 / 条件解析
pub mod parser;

// 区块渲染器
pub mod renderer;

// 页面组合与主题外壳
pub mod runtime;

pub use config::RenderOptions;
pub use error::{Diagnostic, Error, RenderError, RenderResult};
pub use event::{Action, HandlerTable, HostCall, Handlers};
pub use parser::{Block, BlockKind, DataMap, PageData, Scope, ThemeData};
pub use renderer::{BlockRenderer, RenderNode, ViewState};
pub use runtime::{PageComposer, ThemeShell};

// 单元测试
#[cfg(test)]
mod tests;

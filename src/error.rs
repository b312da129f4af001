//! 错误类型与非致命诊断

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// 渲染期错误 - 只有 schema 本身有问题时才会出现
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render depth limit {limit} exceeded at {path}")]
    RecursionLimit { limit: usize, path: String },
}

/// 对外的错误类型（加载 schema、读文件、渲染）
#[derive(Debug, Error)]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// 非致命诊断：记录日志后该子树降级为空，不会向上抛出
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("repeater is missing `source` or `template`")]
    MissingRepeaterInputs,

    #[error("repeater source `{path}` is not an array")]
    NonArraySource { path: String },

    #[error("unknown event action `{action}`")]
    UnknownEventAction { action: String },

    #[error("unknown event trigger `{trigger}`")]
    UnknownTrigger { trigger: String },

    #[error("unknown condition operator `{operator}`")]
    UnknownOperator { operator: String },

    #[error("swiper breakpoint `{key}` is not a width")]
    InvalidBreakpoint { key: String },

    #[error("unsupported swiper effect `{effect}`, using slide")]
    UnsupportedEffect { effect: String },
}

impl Diagnostic {
    /// 输出为 warn 级别日志
    pub fn emit(&self) {
        tracing::warn!(diagnostic = %self, "block render diagnostic");
    }
}

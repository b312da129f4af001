//! 渲染配置

use serde::Deserialize;

/// engine.json 配置结构
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    /// 最大渲染深度，超出即视为 schema 自引用
    pub max_depth: usize,
    /// 视口宽度，用于解析 swiper 断点
    pub viewport_width: Option<u32>,
    /// 是否输出仅开发期需要的诊断
    pub dev_diagnostics: bool,
    /// img 的 src 为空时使用的占位图
    pub placeholder_image: String,
}

fn default_max_depth() -> usize { 64 }

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/placeholder-product.svg";

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            viewport_width: None,
            dev_diagnostics: cfg!(debug_assertions),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_viewport(mut self, width: u32) -> Self {
        self.viewport_width = Some(width);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

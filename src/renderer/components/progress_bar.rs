//! progress_bar 组件 - 跟随轮播位置的进度条
//!
//! 数据作用域中 `swiper_target` 指定轮播 id（缺省 `swiper`），`total_slides` 为总页数（缺省 1）。
//! 进度 = (当前下标 + 1) / 总页数 × 100，写入宽度百分比。

use super::ComponentContext;
use crate::parser::Block;
use crate::renderer::node::{ElementNode, RenderNode};
use crate::renderer::style_resolver::format_number;
use serde_json::Value as JsonValue;

/// 缺省跟随的轮播 id
const DEFAULT_TARGET: &str = "swiper";

pub struct ProgressBarComponent;

impl ProgressBarComponent {
    pub(crate) fn build(block: &Block, index: usize, ctx: &ComponentContext<'_, '_>) -> RenderNode {
        let renderer = ctx.renderer;
        let target = ctx
            .scope
            .get("swiper_target")
            .and_then(JsonValue::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TARGET);
        let total = ctx
            .scope
            .get("total_slides")
            .and_then(JsonValue::as_f64)
            .filter(|n| *n > 0.0)
            .unwrap_or(1.0);

        let active = renderer.state().carousel_index(target) as f64;
        let progress = format_number(((active + 1.0) / total * 100.0).min(100.0));

        let mut element = ElementNode::new(block.key(index), "div");
        element.id = renderer.element_id(block, ctx.scope, ctx.context);
        element.classes = ctx.classes(block, None);
        element.style = renderer.style(block, ctx.scope, ctx.context);
        element.style.insert("width".to_string(), JsonValue::from(format!("{}%", progress)));
        element.attrs.insert("data-progress".to_string(), progress);
        element.attrs.insert("data-swiper-target".to_string(), target.to_string());
        RenderNode::Element(element)
    }
}

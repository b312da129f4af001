//! Marquee - 无缝横向滚动
//!
//! 内容渲染一次后按顺序复制三份，平移 0% ↔ -50% 时总能落在重复边界上。
//! pause_on_hover 时鼠标进入 / 离开分别发出 `set_paused(true / false)`，由调用方写回 ViewState。

use super::ComponentContext;
use crate::error::RenderResult;
use crate::event::{Action, EventBinding, EventCallback, HostCall, Trigger};
use crate::parser::block::{MarqueeDirection, MarqueeRepeat};
use crate::parser::{Block, MarqueeSpec};
use crate::renderer::node::{Keyframes, MarqueeNode, RenderNode};
use crate::renderer::style_resolver::format_number;
use serde_json::Value as JsonValue;

/// 副本数量
pub const COPIES: usize = 3;

pub struct MarqueeComponent;

impl MarqueeComponent {
    pub(crate) fn build(
        block: &Block,
        spec: &MarqueeSpec,
        index: usize,
        ctx: &ComponentContext<'_, '_>,
    ) -> RenderResult<Option<RenderNode>> {
        let renderer = ctx.renderer;
        let key = block.key(index);
        let content = renderer.render_children(&block.blocks, ctx.scope, ctx.context, ctx.handlers, ctx.frame)?;

        let copies = (0..COPIES)
            .map(|copy| RenderNode::fragment(format!("{}-copy-{}", key, copy), content.clone()))
            .collect();

        // 暂停状态按 id 记录，没有 id 时退回 key
        let marquee_id = renderer.state_key(block, ctx.scope, ctx.context).unwrap_or_else(|| key.clone());
        let paused = renderer.state().is_paused(&marquee_id);
        let animation = Self::animation(spec);

        let mut style = renderer.style(block, ctx.scope, ctx.context);
        style.insert("animation".to_string(), JsonValue::from(animation.clone()));
        style.insert(
            "animation-play-state".to_string(),
            JsonValue::from(if paused { "paused" } else { "running" }),
        );

        let mut events = renderer.bind_events(block, ctx.scope, ctx.context, ctx.handlers);
        if spec.pause_on_hover {
            for (trigger, pause) in [(Trigger::MouseEnter, true), (Trigger::MouseLeave, false)] {
                let call = HostCall::SetPaused { target: marquee_id.clone(), paused: pause };
                events.push(EventBinding {
                    trigger,
                    action: Action::SetPaused.name().to_string(),
                    callback: EventCallback::fixed(call, ctx.handlers),
                });
            }
        }

        Ok(Some(RenderNode::Marquee(MarqueeNode {
            key,
            tag: block.wrapper.tag.clone(),
            id: renderer.element_id(block, ctx.scope, ctx.context),
            classes: ctx.classes(block, Some("marquee")),
            style,
            direction: Self::direction_name(spec.direction),
            duration: spec.duration,
            repeat: match spec.repeat {
                MarqueeRepeat::Infinite => JsonValue::from("infinite"),
                MarqueeRepeat::Count(n) => JsonValue::from(n),
            },
            animation,
            keyframes: Self::keyframes(spec.direction),
            pause_on_hover: spec.pause_on_hover,
            paused,
            events,
            copies,
        })))
    }

    /// `marquee-left 8s linear infinite`
    pub fn animation(spec: &MarqueeSpec) -> String {
        let repeat = match spec.repeat {
            MarqueeRepeat::Infinite => "infinite".to_string(),
            MarqueeRepeat::Count(n) => n.to_string(),
        };
        format!(
            "marquee-{} {}s linear {}",
            Self::direction_name(spec.direction),
            format_number(spec.duration),
            repeat
        )
    }

    fn keyframes(direction: MarqueeDirection) -> Keyframes {
        let (from, to) = match direction {
            MarqueeDirection::Left => ("translateX(0%)", "translateX(-50%)"),
            MarqueeDirection::Right => ("translateX(-50%)", "translateX(0%)"),
        };
        Keyframes { from: from.to_string(), to: to.to_string() }
    }

    fn direction_name(direction: MarqueeDirection) -> &'static str {
        match direction {
            MarqueeDirection::Left => "left",
            MarqueeDirection::Right => "right",
        }
    }
}

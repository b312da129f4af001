//! 特殊区块组件
//! 每种区块独立文件，均回调 BlockRenderer 渲染子区块

mod icon;
mod marquee;
mod progress_bar;
mod repeater;
mod swiper;

pub use icon::{canonical_name, IconComponent, FALLBACK_ICON};
pub use marquee::{MarqueeComponent, COPIES};
pub use progress_bar::ProgressBarComponent;
pub use repeater::RepeaterComponent;
pub use swiper::{LayoutPatch, PaginationConfig, SlideNav, SwiperComponent, SwiperConfig};

use super::block_renderer::{BlockRenderer, Frame};
use crate::event::Handlers;
use crate::parser::{Block, Scope};

/// 组件构建时共享的上下文
pub(crate) struct ComponentContext<'a, 's> {
    pub renderer: &'a BlockRenderer<'s>,
    pub scope: &'a Scope,
    pub context: &'a Scope,
    pub handlers: &'a Handlers,
    pub frame: &'a Frame,
}

impl ComponentContext<'_, '_> {
    /// 组件自身的类名在前，其余按通用规则去重追加
    pub fn classes(&self, block: &Block, leading: Option<&str>) -> Vec<String> {
        let mut classes: Vec<String> = leading.into_iter().map(str::to_string).collect();
        for class in self.renderer.classes(block, self.scope, self.context, self.frame.class.as_deref()) {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        classes
    }
}

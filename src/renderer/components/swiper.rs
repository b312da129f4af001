//! Swiper 轮播组件
//!
//! 断点按 min-width 由小到大逐层叠加；loop 模式下前后切换按 slide 数取模，
//! 否则钳制在 `[0, count - ceil(slides_per_view)]`（centered_slides 时为 `[0, count - 1]`）。
//! 当前位置保存在 ViewState。

use super::ComponentContext;
use crate::error::{Diagnostic, RenderResult};
use crate::event::{Action, EventBinding, EventCallback, HandlerTable, Handlers, HostCall, Trigger};
use crate::parser::{Block, EventSpec};
use crate::renderer::node::{
    Autoplay, CarouselNavigation, CarouselNode, CarouselPagination, Coverflow, PaginationKind, RenderNode,
    SlideLayout, SwiperEffect,
};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

const DEFAULT_AUTOPLAY_DELAY: u64 = 3000;

/// 断点中可覆盖的布局字段
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutPatch {
    pub slides_per_view: Option<f64>,
    pub space_between: Option<f64>,
}

impl LayoutPatch {
    fn from_value(value: &JsonValue) -> Self {
        Self {
            slides_per_view: number_field(value, &["slides_per_view", "slidesPerView"]),
            space_between: number_field(value, &["space_between", "spaceBetween"]),
        }
    }

    fn apply(&self, layout: &mut SlideLayout) {
        if let Some(spv) = self.slides_per_view {
            layout.slides_per_view = spv;
        }
        if let Some(space) = self.space_between {
            layout.space_between = space;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub clickable: bool,
    pub kind: PaginationKind,
}

/// Swiper 配置（加载时从 `config` 解析）
#[derive(Debug, Clone, PartialEq)]
pub struct SwiperConfig {
    pub layout: SlideLayout,
    /// 当前 slide 居中，非 loop 模式下每一张都能成为当前页
    pub centered_slides: bool,
    /// (min-width, 覆盖值)，按宽度升序
    pub breakpoints: Vec<(u32, LayoutPatch)>,
    pub loop_mode: bool,
    pub effect: SwiperEffect,
    pub cross_fade: bool,
    pub coverflow: Coverflow,
    pub autoplay: Option<Autoplay>,
    pub navigation: bool,
    pub pagination: Option<PaginationConfig>,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        Self {
            layout: SlideLayout { slides_per_view: 1.0, space_between: 0.0 },
            centered_slides: false,
            breakpoints: Vec::new(),
            loop_mode: false,
            effect: SwiperEffect::Slide,
            cross_fade: true,
            coverflow: Coverflow::default(),
            autoplay: None,
            navigation: false,
            pagination: None,
        }
    }
}

impl SwiperConfig {
    /// 宽松解析：缺失或类型不对的字段取默认值
    pub fn from_raw(raw: Option<&JsonValue>) -> Self {
        let mut config = Self::default();
        let Some(raw) = raw.filter(|v| v.is_object()) else {
            return config;
        };

        LayoutPatch::from_value(raw).apply(&mut config.layout);
        config.loop_mode = raw.get("loop").and_then(JsonValue::as_bool).unwrap_or(false);
        config.centered_slides = bool_field(raw, &["centered_slides", "centeredSlides"]).unwrap_or(false);

        config.effect = match raw.get("effect").and_then(JsonValue::as_str) {
            None | Some("slide") => SwiperEffect::Slide,
            Some("fade") => SwiperEffect::Fade,
            Some("coverflow") => SwiperEffect::Coverflow,
            Some(other) => {
                Diagnostic::UnsupportedEffect { effect: other.to_string() }.emit();
                SwiperEffect::Slide
            }
        };
        config.cross_fade = raw
            .get("fade_effect")
            .and_then(|f| f.get("cross_fade"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(true);
        if let Some(coverflow) = raw.get("coverflow_effect").or_else(|| raw.get("coverflowEffect")) {
            let defaults = Coverflow::default();
            config.coverflow = Coverflow {
                rotate: number_field(coverflow, &["rotate"]).unwrap_or(defaults.rotate),
                stretch: number_field(coverflow, &["stretch"]).unwrap_or(defaults.stretch),
                depth: number_field(coverflow, &["depth"]).unwrap_or(defaults.depth),
                modifier: number_field(coverflow, &["modifier"]).unwrap_or(defaults.modifier),
                slide_shadows: bool_field(coverflow, &["slide_shadows", "slideShadows"]).unwrap_or(defaults.slide_shadows),
            };
        }

        config.autoplay = match raw.get("autoplay") {
            Some(JsonValue::Bool(true)) => Some(Autoplay { delay_ms: DEFAULT_AUTOPLAY_DELAY, disable_on_interaction: false }),
            Some(JsonValue::Object(autoplay)) => Some(Autoplay {
                delay_ms: autoplay
                    .get("delay")
                    .and_then(JsonValue::as_u64)
                    .filter(|d| *d > 0)
                    .unwrap_or(DEFAULT_AUTOPLAY_DELAY),
                disable_on_interaction: autoplay
                    .get("disable_on_interaction")
                    .or_else(|| autoplay.get("disableOnInteraction"))
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
            }),
            _ => None,
        };

        if let Some(JsonValue::Object(breakpoints)) = raw.get("breakpoints") {
            config.breakpoints = parse_breakpoints(breakpoints);
        }

        config.navigation = raw.get("navigation").and_then(JsonValue::as_bool).unwrap_or(false);
        config.pagination = match raw.get("pagination") {
            Some(JsonValue::Bool(true)) => Some(PaginationConfig { clickable: true, kind: PaginationKind::Bullets }),
            Some(JsonValue::Object(pagination)) => Some(PaginationConfig {
                clickable: pagination.get("clickable").and_then(JsonValue::as_bool).unwrap_or(true),
                kind: match pagination.get("type").and_then(JsonValue::as_str) {
                    Some("fraction") => PaginationKind::Fraction,
                    Some("progressbar") => PaginationKind::Progressbar,
                    _ => PaginationKind::Bullets,
                },
            }),
            _ => None,
        };

        config
    }

    /// 按视口宽度叠加断点；没有宽度时使用基础布局
    pub fn layout_for(&self, viewport_width: Option<u32>) -> SlideLayout {
        let mut layout = self.layout;
        if let Some(width) = viewport_width {
            for (min_width, patch) in &self.breakpoints {
                if *min_width <= width {
                    patch.apply(&mut layout);
                }
            }
        }
        layout
    }
}

fn parse_breakpoints(breakpoints: &Map<String, JsonValue>) -> Vec<(u32, LayoutPatch)> {
    let mut parsed: Vec<(u32, LayoutPatch)> = breakpoints
        .iter()
        .filter_map(|(key, value)| match key.trim().parse::<u32>() {
            Ok(width) => Some((width, LayoutPatch::from_value(value))),
            Err(_) => {
                Diagnostic::InvalidBreakpoint { key: key.clone() }.emit();
                None
            }
        })
        .collect();
    parsed.sort_by_key(|(width, _)| *width);
    parsed
}

fn number_field(value: &JsonValue, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| value.get(*key).and_then(JsonValue::as_f64))
}

fn bool_field(value: &JsonValue, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| value.get(*key).and_then(JsonValue::as_bool))
}

/// 轮播位置计算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideNav {
    pub count: usize,
    /// 同屏可见的 slide 数
    pub visible: usize,
    pub loop_mode: bool,
    pub active: usize,
}

impl SlideNav {
    pub fn new(count: usize, layout: &SlideLayout, loop_mode: bool, active: usize) -> Self {
        let visible = layout.slides_per_view.ceil().max(1.0) as usize;
        let mut nav = Self { count, visible, loop_mode, active: 0 };
        nav.active = nav.clamp(active);
        nav
    }

    pub fn max_index(&self) -> usize {
        if self.loop_mode {
            self.count.saturating_sub(1)
        } else {
            self.count.saturating_sub(self.visible)
        }
    }

    pub fn clamp(&self, index: usize) -> usize {
        if self.count == 0 {
            0
        } else if self.loop_mode {
            index % self.count
        } else {
            index.min(self.max_index())
        }
    }

    pub fn next(&self) -> usize {
        if self.count == 0 {
            0
        } else if self.loop_mode {
            (self.active + 1) % self.count
        } else {
            (self.active + 1).min(self.max_index())
        }
    }

    pub fn prev(&self) -> usize {
        if self.count == 0 {
            0
        } else if self.loop_mode {
            (self.active + self.count - 1) % self.count
        } else {
            self.active.saturating_sub(1)
        }
    }
}

pub struct SwiperComponent;

impl SwiperComponent {
    pub(crate) fn build(
        block: &Block,
        config: &SwiperConfig,
        index: usize,
        ctx: &ComponentContext<'_, '_>,
    ) -> RenderResult<Option<RenderNode>> {
        let renderer = ctx.renderer;
        let (scope, context) = (ctx.scope, ctx.context);
        let key = block.key(index);
        let swiper_id = renderer.state_key(block, scope, context).unwrap_or_else(|| key.clone());
        let layout = config.layout_for(renderer.options().viewport_width);
        let requested = renderer.state().carousel_index(&swiper_id);

        // slide 数在子节点渲染完之后才确定
        let nav_cell: Arc<OnceCell<SlideNav>> = Arc::new(OnceCell::new());
        let slide_handlers = Arc::new(slider_overlay(ctx.handlers, &swiper_id, Arc::clone(&nav_cell)));

        let slides = renderer.render_children(&block.blocks, scope, context, &slide_handlers, ctx.frame)?;
        let nav_layout = if config.centered_slides {
            SlideLayout { slides_per_view: 1.0, ..layout }
        } else {
            layout
        };
        let nav = SlideNav::new(slides.len(), &nav_layout, config.loop_mode, requested);
        let _ = nav_cell.set(nav);

        let control = |action: &str, value: Option<JsonValue>| {
            let mut spec = EventSpec::new(action, None);
            spec.value = value;
            EventBinding {
                trigger: Trigger::Click,
                action: action.to_string(),
                callback: EventCallback::build(&spec, scope, context, &slide_handlers),
            }
        };

        let navigation = config.navigation.then(|| CarouselNavigation {
            prev: control("slider_prev", None),
            next: control("slider_next", None),
        });

        let pagination = config.pagination.map(|p| CarouselPagination {
            kind: p.kind,
            clickable: p.clickable,
            bullets: if p.clickable && p.kind == PaginationKind::Bullets {
                (0..slides.len()).map(|i| control("slider_goto", Some(JsonValue::from(i)))).collect()
            } else {
                Vec::new()
            },
        });

        Ok(Some(RenderNode::Carousel(CarouselNode {
            key,
            id: swiper_id,
            classes: ctx.classes(block, Some("swiper")),
            style: renderer.style(block, scope, context),
            layout,
            centered_slides: config.centered_slides,
            effect: config.effect,
            cross_fade: (config.effect == SwiperEffect::Fade).then_some(config.cross_fade),
            coverflow: (config.effect == SwiperEffect::Coverflow).then_some(config.coverflow),
            loop_mode: config.loop_mode,
            autoplay: config.autoplay,
            navigation,
            pagination,
            active: nav.active,
            events: renderer.bind_events(block, scope, context, ctx.handlers),
            slides,
        })))
    }
}

/// 子树内的 slider_* 调用改写成针对本轮播的 SliderGoto；指向其它轮播的原样转发
fn slider_overlay(outer: &Handlers, swiper_id: &str, nav: Arc<OnceCell<SlideNav>>) -> HandlerTable {
    let targets_self = {
        let id = swiper_id.to_string();
        move |target: &str| target.is_empty() || target == id
    };

    let translate = {
        let outer = Arc::clone(outer);
        let id = swiper_id.to_string();
        move |call: &HostCall| {
            let step = |f: fn(&SlideNav) -> usize| nav.get().map(f);
            let goto = match call {
                HostCall::SliderPrev { target } if targets_self(target) => step(SlideNav::prev),
                HostCall::SliderNext { target } if targets_self(target) => step(SlideNav::next),
                HostCall::SliderGoto { target, index } if targets_self(target) => nav.get().map(|n| n.clamp(*index)),
                _ => {
                    outer.dispatch(call);
                    return;
                }
            };
            if let Some(index) = goto {
                outer.dispatch(&HostCall::SliderGoto { target: id.clone(), index });
            }
        }
    };

    let translate = Arc::new(translate);
    let mut table = HandlerTable::new();
    for action in [Action::SliderPrev, Action::SliderNext, Action::SliderGoto] {
        let translate = Arc::clone(&translate);
        table.insert(action, Arc::new(move |call: &HostCall| translate(call)));
    }
    outer.overlay(table)
}

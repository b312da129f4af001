//! 渲染树节点 - 框架无关的输出结构

use super::style_resolver::StyleMap;
use crate::event::{EventBinding, Trigger};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 渲染节点
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderNode {
    Element(ElementNode),
    Text(TextNode),
    Icon(IconNode),
    Fragment(FragmentNode),
    Marquee(MarqueeNode),
    Carousel(CarouselNode),
}

/// 普通元素
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementNode {
    pub key: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: StyleMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventBinding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl ElementNode {
    pub fn new(key: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            style: StyleMap::new(),
            attrs: BTreeMap::new(),
            events: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn event(&self, trigger: Trigger) -> Option<&EventBinding> {
        self.events.iter().find(|e| e.trigger == trigger)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub text: String,
}

/// 图标，name 为规范化后的图标名
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconNode {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: StyleMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventBinding>,
}

/// 无外层元素的节点组（Repeater 展开、Marquee 副本）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentNode {
    pub key: String,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyframes {
    pub from: String,
    pub to: String,
}

/// 无缝滚动容器，copies 固定为三份相同内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarqueeNode {
    pub key: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: StyleMap,
    pub direction: &'static str,
    pub duration: f64,
    /// `"infinite"` 或次数
    pub repeat: JsonValue,
    pub animation: String,
    pub keyframes: Keyframes,
    pub pause_on_hover: bool,
    pub paused: bool,
    /// 声明的事件，pause_on_hover 时追加进入 / 离开的暂停切换
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventBinding>,
    pub copies: Vec<RenderNode>,
}

/// 轮播布局（已按视口解析断点）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlideLayout {
    pub slides_per_view: f64,
    pub space_between: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Autoplay {
    pub delay_ms: u64,
    pub disable_on_interaction: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwiperEffect {
    Slide,
    Fade,
    Coverflow,
}

/// coverflow 效果参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverflow {
    pub rotate: f64,
    pub stretch: f64,
    pub depth: f64,
    pub modifier: f64,
    pub slide_shadows: bool,
}

impl Default for Coverflow {
    fn default() -> Self {
        Self { rotate: 0.0, stretch: 0.0, depth: 100.0, modifier: 2.5, slide_shadows: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationKind {
    Bullets,
    Fraction,
    Progressbar,
}

/// 前后切换按钮
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselNavigation {
    pub prev: EventBinding,
    pub next: EventBinding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselPagination {
    #[serde(rename = "type")]
    pub kind: PaginationKind,
    pub clickable: bool,
    /// 可点击的圆点，每页一个
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<EventBinding>,
}

/// 轮播
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselNode {
    pub key: String,
    pub id: String,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: StyleMap,
    pub layout: SlideLayout,
    pub centered_slides: bool,
    pub effect: SwiperEffect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_fade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverflow: Option<Coverflow>,
    #[serde(rename = "loop")]
    pub loop_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<Autoplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<CarouselNavigation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<CarouselPagination>,
    pub active: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventBinding>,
    pub slides: Vec<RenderNode>,
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(TextNode { text: text.into() })
    }

    pub fn fragment(key: impl Into<String>, children: Vec<RenderNode>) -> Self {
        RenderNode::Fragment(FragmentNode { key: key.into(), children })
    }

    /// 文本节点没有 key
    pub fn key(&self) -> Option<&str> {
        match self {
            RenderNode::Element(n) => Some(&n.key),
            RenderNode::Text(_) => None,
            RenderNode::Icon(n) => Some(&n.key),
            RenderNode::Fragment(n) => Some(&n.key),
            RenderNode::Marquee(n) => Some(&n.key),
            RenderNode::Carousel(n) => Some(&n.key),
        }
    }

    pub fn set_key(&mut self, key: String) {
        match self {
            RenderNode::Element(n) => n.key = key,
            RenderNode::Text(_) => {}
            RenderNode::Icon(n) => n.key = key,
            RenderNode::Fragment(n) => n.key = key,
            RenderNode::Marquee(n) => n.key = key,
            RenderNode::Carousel(n) => n.key = key,
        }
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element(n) => &n.children,
            RenderNode::Fragment(n) => &n.children,
            RenderNode::Marquee(n) => &n.copies,
            RenderNode::Carousel(n) => &n.slides,
            RenderNode::Text(_) | RenderNode::Icon(_) => &[],
        }
    }

    /// 节点上挂载的事件
    pub fn events(&self) -> &[EventBinding] {
        match self {
            RenderNode::Element(n) => &n.events,
            RenderNode::Icon(n) => &n.events,
            RenderNode::Marquee(n) => &n.events,
            RenderNode::Carousel(n) => &n.events,
            RenderNode::Text(_) | RenderNode::Fragment(_) => &[],
        }
    }

    pub fn event(&self, trigger: Trigger) -> Option<&EventBinding> {
        self.events().iter().find(|e| e.trigger == trigger)
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            RenderNode::Element(n) => Some(n),
            _ => None,
        }
    }

    /// 深度优先查找第一个满足条件的节点
    pub fn find(&self, pred: &dyn Fn(&RenderNode) -> bool) -> Option<&RenderNode> {
        if pred(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(pred))
    }

    pub fn find_by_key(&self, key: &str) -> Option<&RenderNode> {
        self.find(&|node| node.key() == Some(key))
    }

    pub fn find_element_by_id(&self, id: &str) -> Option<&ElementNode> {
        self.find(&|node| matches!(node, RenderNode::Element(e) if e.id.as_deref() == Some(id)))
            .and_then(RenderNode::as_element)
    }

    /// 按文档顺序拼接所有文本
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let RenderNode::Text(t) = self {
            out.push_str(&t.text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}

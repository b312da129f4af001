//! 区块 schema - 加载时一次性确定区块种类

use super::binding::{resolve, value_to_string};
use super::condition::Condition;
use super::wrapper::Wrapper;
use super::DataMap;
use crate::renderer::components::SwiperConfig;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 渲染树中的一个节点
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub kind: BlockKind,
    pub wrapper: Wrapper,
    /// schema 中原始的 `type`，input 的 type 属性会用到
    pub type_name: Option<String>,
    pub id: Option<String>,
    /// 动态 id，解析结果同时作为元素 id 和可见性状态的 id
    pub bind_id: Option<String>,
    pub class: Option<String>,
    pub style: Option<DataMap>,
    pub bind_style: Option<DataMap>,
    pub data: Option<DataMap>,
    pub blocks: Vec<Block>,
    pub condition: Option<Condition>,
    /// 事件类型 → 事件描述，按事件类型排序
    pub events: BTreeMap<String, EventSpec>,
    pub state: Option<BlockState>,

    pub content: Option<String>,
    pub bind_content: Option<String>,
    pub src: Option<String>,
    pub bind_src: Option<String>,
    pub alt: Option<String>,
    pub bind_alt: Option<String>,
    pub href: Option<String>,
    pub bind_href: Option<String>,
    pub url: Option<String>,
    pub bind_url: Option<String>,
    pub icon: Option<String>,
    pub bind_icon: Option<String>,
    pub placeholder: Option<String>,
    pub bind_placeholder: Option<String>,
    pub bind_class: Option<String>,
    pub aria_label: Option<String>,
    pub icon_size: Option<f64>,
}

/// 区块种类
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Generic,
    Repeater(RepeaterSpec),
    Swiper(SwiperConfig),
    Marquee(MarqueeSpec),
    Icon,
    /// 跟随轮播位置的进度条
    ProgressBar,
}

/// 可见性开关
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockState {
    #[serde(default)]
    pub visible: Option<bool>,
}

/// `{ action, target?, value?, payload? }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventSpec {
    pub action: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub value: Option<JsonValue>,
    #[serde(default)]
    pub payload: Option<JsonValue>,
}

impl EventSpec {
    pub fn new(action: &str, target: Option<&str>) -> Self {
        Self { action: action.to_string(), target: target.map(str::to_string), value: None, payload: None }
    }

    /// 目标表达式：target 优先，其次 payload 字符串或 payload 中的常见字段
    pub fn target_expr(&self) -> Option<&str> {
        if let Some(target) = self.target.as_deref() {
            return Some(target);
        }
        match self.payload.as_ref()? {
            JsonValue::String(s) => Some(s.as_str()),
            JsonValue::Object(map) => ["target", "url", "query", "index"]
                .iter()
                .find_map(|key| map.get(*key).and_then(JsonValue::as_str)),
            _ => None,
        }
    }

    pub fn value_expr(&self) -> Option<&JsonValue> {
        self.value.as_ref().or_else(|| match self.payload.as_ref()? {
            JsonValue::Object(map) => map.get("value"),
            _ => None,
        })
    }
}

/// Repeater 参数
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterSpec {
    pub source: Option<String>,
    pub iterator: String,
    pub index: Option<String>,
    pub template: Option<Box<Block>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeRepeat {
    Infinite,
    Count(u32),
}

/// Marquee 动画参数
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeSpec {
    pub direction: MarqueeDirection,
    /// 秒
    pub duration: f64,
    pub repeat: MarqueeRepeat,
    pub pause_on_hover: bool,
}

impl Default for MarqueeSpec {
    fn default() -> Self {
        Self {
            direction: MarqueeDirection::Left,
            duration: 8.0,
            repeat: MarqueeRepeat::Infinite,
            pause_on_hover: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AnimationSpec {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    repeat: Option<JsonValue>,
    #[serde(default)]
    pause_on_hover: Option<bool>,
}

impl AnimationSpec {
    fn to_marquee(&self) -> MarqueeSpec {
        let defaults = MarqueeSpec::default();
        let direction = match self.direction.as_deref() {
            Some("right") => MarqueeDirection::Right,
            _ => MarqueeDirection::Left,
        };
        let duration = self.duration.filter(|d| *d > 0.0).unwrap_or(defaults.duration);
        let repeat = match &self.repeat {
            Some(JsonValue::Number(n)) => n.as_u64().map(|n| MarqueeRepeat::Count(n as u32)).unwrap_or(MarqueeRepeat::Infinite),
            Some(JsonValue::String(s)) => s.parse::<u32>().map(MarqueeRepeat::Count).unwrap_or(MarqueeRepeat::Infinite),
            _ => MarqueeRepeat::Infinite,
        };
        MarqueeSpec {
            direction,
            duration,
            repeat,
            pause_on_hover: self.pause_on_hover.unwrap_or(defaults.pause_on_hover),
        }
    }
}

/// 反序列化用的原始形态
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlock {
    wrapper: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<String>,
    class: Option<String>,
    id: Option<String>,
    bind_id: Option<String>,
    style: Option<DataMap>,
    bind_style: Option<DataMap>,
    data: Option<DataMap>,
    blocks: Vec<Block>,
    condition: Option<Condition>,
    events: BTreeMap<String, EventSpec>,
    animation: Option<AnimationSpec>,
    state: Option<BlockState>,

    content: Option<JsonValue>,
    bind_content: Option<String>,
    src: Option<String>,
    bind_src: Option<String>,
    alt: Option<String>,
    bind_alt: Option<String>,
    href: Option<String>,
    bind_href: Option<String>,
    url: Option<String>,
    bind_url: Option<String>,
    icon: Option<String>,
    bind_icon: Option<String>,
    placeholder: Option<String>,
    bind_placeholder: Option<String>,
    bind_class: Option<String>,
    aria_label: Option<String>,
    icon_size: Option<f64>,
    size: Option<f64>,

    source: Option<String>,
    iterator: Option<String>,
    index: Option<String>,
    template: Option<Box<Block>>,
    config: Option<JsonValue>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let wrapper = raw.wrapper.as_deref().map(Wrapper::parse).unwrap_or_default();
        let is_marquee_animation = raw
            .animation
            .as_ref()
            .and_then(|a| a.kind.as_deref())
            .map(|kind| kind == "marquee")
            .unwrap_or(false);

        let kind = match raw.type_name.as_deref() {
            Some("repeater") => BlockKind::Repeater(RepeaterSpec {
                source: raw.source.filter(|s| !s.trim().is_empty()),
                iterator: raw.iterator.filter(|s| !s.is_empty()).unwrap_or_else(|| "item".to_string()),
                index: raw.index.filter(|s| !s.is_empty()),
                template: raw.template,
            }),
            Some("swiper") => BlockKind::Swiper(SwiperConfig::from_raw(raw.config.as_ref())),
            Some("marquee") => BlockKind::Marquee(raw.animation.as_ref().map(AnimationSpec::to_marquee).unwrap_or_default()),
            _ if is_marquee_animation => BlockKind::Marquee(raw.animation.as_ref().map(AnimationSpec::to_marquee).unwrap_or_default()),
            Some("progress_bar") => BlockKind::ProgressBar,
            Some("icon") => BlockKind::Icon,
            _ if wrapper.tag == "svg" && (raw.icon.is_some() || raw.bind_icon.is_some()) => BlockKind::Icon,
            _ => BlockKind::Generic,
        };

        Block {
            kind,
            wrapper,
            type_name: raw.type_name,
            id: raw.id,
            bind_id: raw.bind_id,
            class: raw.class,
            style: raw.style,
            bind_style: raw.bind_style,
            data: raw.data,
            blocks: raw.blocks,
            condition: raw.condition,
            events: raw.events,
            state: raw.state,
            content: raw.content.as_ref().map(value_to_string),
            bind_content: raw.bind_content,
            src: raw.src,
            bind_src: raw.bind_src,
            alt: raw.alt,
            bind_alt: raw.bind_alt,
            href: raw.href,
            bind_href: raw.bind_href,
            url: raw.url,
            bind_url: raw.bind_url,
            icon: raw.icon,
            bind_icon: raw.bind_icon,
            placeholder: raw.placeholder,
            bind_placeholder: raw.bind_placeholder,
            bind_class: raw.bind_class,
            aria_label: raw.aria_label,
            icon_size: raw.icon_size.or(raw.size),
        }
    }
}

impl Block {
    /// 从 JSON 值加载
    pub fn from_value(value: JsonValue) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// 渲染到元素上的 id：wrapper 里的 id 优先
    pub fn element_id(&self) -> Option<&str> {
        self.wrapper.id.as_deref().or(self.id.as_deref())
    }

    /// 可见性状态使用的 id：block.id 优先
    pub fn state_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.wrapper.id.as_deref())
    }

    /// bind_id 解析出的动态 id，null 或解析不到时为 None
    pub fn bound_id(&self, data: &DataMap, context: &DataMap) -> Option<String> {
        self.bind_id
            .as_deref()
            .and_then(|path| resolve(path, data, context))
            .filter(|value| !value.is_null())
            .map(value_to_string)
    }

    /// 兄弟节点间稳定的标识
    pub fn key(&self, index: usize) -> String {
        if let Some(id) = self.state_id() {
            return id.to_string();
        }
        format!("block-{}-{}", self.type_name.as_deref().unwrap_or("element"), index)
    }

    /// on_click 优先于 click
    pub fn click_event(&self) -> Option<&EventSpec> {
        self.events.get("on_click").or_else(|| self.events.get("click"))
    }
}

//! 区块渲染器 - 递归核心
//!
//! 每次调用：合并作用域 → 求值条件（失败则整棵子树剪除）→ 按种类分发。
//! 普通元素在这里渲染，Repeater / Marquee / Swiper / Icon / ProgressBar 交给 components。
//! 入口处把 ViewState 中的抽屉开关以 `_drawer` 注入数据作用域，schema 条件可以直接引用。

use super::components::{
    ComponentContext, IconComponent, MarqueeComponent, ProgressBarComponent, RepeaterComponent, SwiperComponent,
};
use super::node::{ElementNode, RenderNode};
use super::state::ViewState;
use super::style_resolver::StyleResolver;
use crate::config::RenderOptions;
use crate::error::{RenderError, RenderResult};
use crate::event::{Action, EventBinding, EventCallback, Handlers, Trigger};
use crate::parser::binding::{resolve, resolve_string};
use crate::parser::{merge_scope, Block, BlockKind, DataMap, Scope, TemplateEngine};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 递归位置：深度、路径（用于错误信息）和调用方附加的类名
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub depth: usize,
    pub path: String,
    pub class: Option<String>,
}

impl Frame {
    pub fn root() -> Self {
        Self { depth: 0, path: String::new(), class: None }
    }

    pub fn with_class(mut self, class: Option<&str>) -> Self {
        self.class = class.filter(|c| !c.trim().is_empty()).map(str::to_string);
        self
    }

    /// 进入下一层，调用方类名不向下传递
    pub fn child(&self, segment: &str) -> Self {
        let path = if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}/{}", self.path, segment)
        };
        Self { depth: self.depth + 1, path, class: None }
    }
}

/// 注入抽屉开关的作用域键
pub const DRAWER_KEY: &str = "_drawer";

/// 区块渲染器
pub struct BlockRenderer<'s> {
    options: RenderOptions,
    state: &'s ViewState,
}

impl<'s> BlockRenderer<'s> {
    pub fn new(options: RenderOptions, state: &'s ViewState) -> Self {
        Self { options, state }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn state(&self) -> &ViewState {
        self.state
    }

    /// 渲染单个区块；条件不成立或内容为空时返回 None
    pub fn render(
        &self,
        block: &Block,
        data: &Scope,
        context: &Scope,
        handlers: &Handlers,
    ) -> RenderResult<Option<RenderNode>> {
        self.render_node(block, 0, &self.root_scope(data), context, handlers, &Frame::root())
    }

    /// 同 render，附加调用方类名
    pub fn render_with_class(
        &self,
        block: &Block,
        class: &str,
        data: &Scope,
        context: &Scope,
        handlers: &Handlers,
    ) -> RenderResult<Option<RenderNode>> {
        let frame = Frame::root().with_class(Some(class));
        self.render_node(block, 0, &self.root_scope(data), context, handlers, &frame)
    }

    /// 按数组顺序渲染兄弟区块
    pub fn render_blocks(
        &self,
        blocks: &[Block],
        data: &Scope,
        context: &Scope,
        handlers: &Handlers,
    ) -> RenderResult<Vec<RenderNode>> {
        self.render_children(blocks, &self.root_scope(data), context, handlers, &Frame::root())
    }

    /// `{...data, _drawer: {id: bool}}`
    fn root_scope(&self, data: &Scope) -> Scope {
        let mut drawer = DataMap::new();
        drawer.insert(DRAWER_KEY.to_string(), JsonValue::Object(self.state.drawer_states()));
        merge_scope(data, Some(&drawer))
    }

    pub(crate) fn render_node(
        &self,
        block: &Block,
        index: usize,
        data: &Scope,
        context: &Scope,
        handlers: &Handlers,
        frame: &Frame,
    ) -> RenderResult<Option<RenderNode>> {
        if frame.depth > self.options.max_depth {
            return Err(RenderError::RecursionLimit {
                limit: self.options.max_depth,
                path: frame.path.clone(),
            });
        }

        let scope = merge_scope(data, block.data.as_ref());

        if let Some(condition) = &block.condition {
            if !condition.evaluate(&scope, context) {
                return Ok(None);
            }
        }

        let ctx = ComponentContext { renderer: self, scope: &scope, context, handlers, frame };
        match &block.kind {
            BlockKind::Generic => self.render_element(block, index, &scope, context, handlers, frame),
            BlockKind::Repeater(spec) => RepeaterComponent::build(block, spec, index, &ctx),
            BlockKind::Swiper(config) => SwiperComponent::build(block, config, index, &ctx),
            BlockKind::Marquee(spec) => MarqueeComponent::build(block, spec, index, &ctx),
            BlockKind::Icon => Ok(Some(IconComponent::build(block, index, &ctx))),
            BlockKind::ProgressBar => Ok(Some(ProgressBarComponent::build(block, index, &ctx))),
        }
    }

    /// 子区块共享同一个 scope / context；Fragment 会被展开
    pub(crate) fn render_children(
        &self,
        blocks: &[Block],
        scope: &Scope,
        context: &Scope,
        handlers: &Handlers,
        frame: &Frame,
    ) -> RenderResult<Vec<RenderNode>> {
        let mut children = Vec::with_capacity(blocks.len());
        for (i, child) in blocks.iter().enumerate() {
            let child_frame = frame.child(&child.key(i));
            if let Some(node) = self.render_node(child, i, scope, context, handlers, &child_frame)? {
                match node {
                    RenderNode::Fragment(fragment) => children.extend(fragment.children),
                    node => children.push(node),
                }
            }
        }
        Ok(children)
    }

    fn render_element(
        &self,
        block: &Block,
        index: usize,
        scope: &Scope,
        context: &Scope,
        handlers: &Handlers,
        frame: &Frame,
    ) -> RenderResult<Option<RenderNode>> {
        let tag = block.wrapper.tag.as_str();
        let mut attrs = BTreeMap::new();

        match tag {
            "img" => {
                let src = bound_text(block.bind_src.as_deref(), block.src.as_deref(), scope, context)
                    .filter(|src| !src.is_empty())
                    .unwrap_or_else(|| self.options.placeholder_image.clone());
                attrs.insert("src".to_string(), src);
                let alt = bound_text(block.bind_alt.as_deref(), block.alt.as_deref(), scope, context);
                attrs.insert("alt".to_string(), alt.unwrap_or_default());
            }
            "a" => {
                attrs.insert("href".to_string(), link_href(block, scope, context));
            }
            "input" => {
                let placeholder = bound_text(block.bind_placeholder.as_deref(), block.placeholder.as_deref(), scope, context);
                if let Some(placeholder) = placeholder {
                    attrs.insert("placeholder".to_string(), placeholder);
                }
                attrs.insert("type".to_string(), input_type(block.type_name.as_deref()).to_string());
            }
            _ => {}
        }

        if let Some(label) = &block.aria_label {
            attrs.insert("aria-label".to_string(), label.clone());
        }

        let mut element = ElementNode::new(block.key(index), tag);
        element.id = self.element_id(block, scope, context);
        element.classes = self.classes(block, scope, context, frame.class.as_deref());
        element.style = self.style(block, scope, context);
        element.events = self.bind_events(block, scope, context, handlers);
        element.attrs = attrs;

        if element.event(Trigger::Click).is_some() {
            element.style.insert("cursor".to_string(), JsonValue::from("pointer"));
        }

        if !block.wrapper.is_void() {
            element.children = if block.blocks.is_empty() {
                content(block, scope, context).map(RenderNode::text).into_iter().collect()
            } else {
                self.render_children(&block.blocks, scope, context, handlers, frame)?
            };
        }

        Ok(Some(RenderNode::Element(element)))
    }

    /// wrapper 类名 + class + 调用方类名 + bind_class，去重保序
    pub(crate) fn classes(&self, block: &Block, scope: &DataMap, context: &DataMap, caller: Option<&str>) -> Vec<String> {
        let bound = block.bind_class.as_deref().and_then(|path| resolve_string(path, scope, context));
        let mut classes: Vec<String> = Vec::new();
        let sources = block
            .wrapper
            .classes
            .iter()
            .map(String::as_str)
            .chain(block.class.as_deref().into_iter().flat_map(str::split_whitespace))
            .chain(caller.into_iter().flat_map(str::split_whitespace))
            .chain(bound.as_deref().into_iter().flat_map(str::split_whitespace));
        for class in sources {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
        classes
    }

    /// 解析后的样式，不可见时在其上追加 `display: none`
    pub(crate) fn style(&self, block: &Block, scope: &DataMap, context: &DataMap) -> super::style_resolver::StyleMap {
        let mut style = StyleResolver::new(scope, context).resolve(block.style.as_ref(), block.bind_style.as_ref());
        if !self.is_visible(block, scope, context) {
            style.insert("display".to_string(), JsonValue::from("none"));
        }
        style
    }

    /// 只有声明了 state 的区块才受可见性控制；ViewState 中的覆盖值优先于 schema 默认值
    pub(crate) fn is_visible(&self, block: &Block, scope: &DataMap, context: &DataMap) -> bool {
        let Some(state) = &block.state else {
            return true;
        };
        self.state_key(block, scope, context)
            .and_then(|id| self.state.visibility(&id))
            .or(state.visible)
            .unwrap_or(true)
    }

    /// ViewState 的键：bind_id 解析结果优先，其次静态 id
    pub(crate) fn state_key(&self, block: &Block, scope: &DataMap, context: &DataMap) -> Option<String> {
        block.bound_id(scope, context).or_else(|| block.state_id().map(str::to_string))
    }

    /// 输出到节点上的 id
    pub(crate) fn element_id(&self, block: &Block, scope: &DataMap, context: &DataMap) -> Option<String> {
        block.bound_id(scope, context).or_else(|| block.element_id().map(str::to_string))
    }

    pub(crate) fn bind_events(&self, block: &Block, scope: &Scope, context: &Scope, handlers: &Handlers) -> Vec<EventBinding> {
        let mut events = Vec::with_capacity(block.events.len());
        for (name, spec) in &block.events {
            let trigger = match name.parse::<Trigger>() {
                Ok(trigger) => trigger,
                Err(diagnostic) => {
                    diagnostic.emit();
                    continue;
                }
            };
            events.push(EventBinding {
                trigger,
                action: spec.action.clone(),
                callback: EventCallback::build(spec, scope, context, handlers),
            });
        }
        events
    }
}

/// 绑定值优先，解析不到或为空串时使用字面量
pub(crate) fn bound_text(bind: Option<&str>, literal: Option<&str>, scope: &DataMap, context: &DataMap) -> Option<String> {
    bind.and_then(|path| resolve_string(path, scope, context))
        .filter(|value| !value.is_empty())
        .or_else(|| literal.map(str::to_string))
}

/// bind_href（仅字符串）→ bind_url → href → url → 点击 navigate 的目标 → `#`
fn link_href(block: &Block, scope: &DataMap, context: &DataMap) -> String {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    let bound = |path: Option<&str>| {
        non_empty(path.and_then(|p| resolve(p, scope, context)).and_then(JsonValue::as_str).map(str::to_string))
    };

    bound(block.bind_href.as_deref())
        .or_else(|| non_empty(block.bind_url.as_deref().and_then(|p| resolve_string(p, scope, context))))
        .or_else(|| non_empty(block.href.clone()))
        .or_else(|| non_empty(block.url.clone()))
        .or_else(|| non_empty(navigate_target(block, scope, context)))
        .unwrap_or_else(|| "#".to_string())
}

/// 含 `.` 的目标按数据路径解析，否则原样作为地址
fn navigate_target(block: &Block, scope: &DataMap, context: &DataMap) -> Option<String> {
    let spec = block.click_event()?;
    if spec.action.parse::<Action>().ok()? != Action::Navigate {
        return None;
    }
    let target = spec.target_expr()?;
    if target.contains('.') {
        resolve_string(target, scope, context)
    } else {
        Some(target.to_string())
    }
}

/// bind_content 优先；字面量 content 支持 {{}} 插值
fn content(block: &Block, scope: &DataMap, context: &DataMap) -> Option<String> {
    if let Some(bound) = block.bind_content.as_deref().and_then(|path| resolve_string(path, scope, context)) {
        return Some(bound);
    }
    let literal = block.content.as_deref()?;
    if TemplateEngine::has_expression(literal) {
        Some(TemplateEngine::interpolate(literal, scope, context))
    } else {
        Some(literal.to_string())
    }
}

fn input_type(type_name: Option<&str>) -> &str {
    match type_name {
        None | Some("") | Some("text_input") | Some("input") => "text",
        Some(other) => other,
    }
}

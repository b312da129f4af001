//! 主题外壳 - 公告栏 / 页头 / 页面内容 / 页脚，以及外壳级 UI 状态

use super::page::PageComposer;
use crate::config::RenderOptions;
use crate::error::RenderResult;
use crate::event::{Action, EventBinding, EventCallback, HandlerTable, Handlers, HostCall, Trigger};
use crate::parser::{merge_scope, DataMap, EventSpec, GlobalSection, PageData, Scope, ThemeData};
use crate::renderer::node::ElementNode;
use crate::renderer::{BlockRenderer, RenderNode, ViewState};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, PoisonError};

pub const MOBILE_MENU: &str = "mobile_menu";
pub const CART_DRAWER: &str = "cart_drawer";

/// 外壳持有的开关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShellState {
    pub mobile_menu_open: bool,
    pub cart_drawer_open: bool,
    pub dark_mode: bool,
}

/// 主题外壳
pub struct ThemeShell {
    theme: ThemeData,
    options: RenderOptions,
    state: ShellState,
    view: ViewState,
    host: Handlers,
    queue: Arc<Mutex<Vec<HostCall>>>,
}

impl ThemeShell {
    pub fn new(theme: ThemeData, options: RenderOptions, host: Handlers) -> Self {
        let mut view = ViewState::new();
        for (_, section) in regions(&theme) {
            view.register_defaults(&section.blocks);
        }
        let mut shell = Self {
            theme,
            options,
            state: ShellState::default(),
            view,
            host,
            queue: Arc::new(Mutex::new(Vec::new())),
        };
        shell.sync_drawers();
        shell
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.state.dark_mode = dark_mode;
        self
    }

    pub fn theme(&self) -> &ThemeData {
        &self.theme
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// 登记页面区块的默认可见性
    pub fn register_page(&mut self, page: &PageData) {
        for section in &page.sections {
            self.view.register_defaults(&section.blocks);
        }
        self.sync_drawers();
    }

    /// 抽屉开关以 ViewState 中登记的默认可见性为初值
    fn sync_drawers(&mut self) {
        self.state.mobile_menu_open = self.view.visibility(MOBILE_MENU).unwrap_or(self.state.mobile_menu_open);
        self.state.cart_drawer_open = self.view.visibility(CART_DRAWER).unwrap_or(self.state.cart_drawer_open);
    }

    /// 外壳开关与同 id 区块的可见性一起更新
    fn set_drawer(&mut self, target: &str, open: bool) {
        match target {
            MOBILE_MENU => self.state.mobile_menu_open = open,
            CART_DRAWER => self.state.cart_drawer_open = open,
            _ => return,
        }
        self.view.set_visible(target, open);
    }

    /// `{colors, fonts, border_radius, cart_count, dark_mode}` + 调用方数据；dark_mode 以外壳为准
    pub fn global_data(&self, data: &DataMap) -> Scope {
        let settings = &self.theme.global_settings;
        let mut global = DataMap::new();
        global.insert("colors".to_string(), JsonValue::Object(settings.colors.clone()));
        global.insert("fonts".to_string(), JsonValue::Object(settings.fonts.clone()));
        global.insert("border_radius".to_string(), JsonValue::Object(settings.border_radius.clone()));
        global.insert("cart_count".to_string(), JsonValue::from(0));
        for (key, value) in data {
            global.insert(key.clone(), value.clone());
        }
        global.insert("dark_mode".to_string(), JsonValue::Bool(self.state.dark_mode));
        Arc::new(global)
    }

    /// 外壳分发表：所有调用先入队，由 process_events 统一处理
    pub fn handlers(&self) -> Handlers {
        let mut table = HandlerTable::new();
        for action in Action::ALL {
            let queue = Arc::clone(&self.queue);
            table.insert(
                action,
                Arc::new(move |call: &HostCall| {
                    queue.lock().unwrap_or_else(PoisonError::into_inner).push(call.clone());
                }),
            );
        }
        Arc::new(table)
    }

    pub fn pending_events(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 取出队列中的调用：更新外壳状态和 ViewState，再转发给宿主
    ///
    /// mobile_menu / cart_drawer 的开关同时写入同 id 区块的可见性，`_drawer` 条件随之生效。
    pub fn process_events(&mut self) -> usize {
        let calls = std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner));

        for call in &calls {
            match call {
                HostCall::ToggleDrawer { target } if target == MOBILE_MENU => {
                    self.set_drawer(MOBILE_MENU, !self.state.mobile_menu_open);
                }
                HostCall::ToggleDrawer { target } if target == CART_DRAWER => {
                    self.set_drawer(CART_DRAWER, !self.state.cart_drawer_open);
                }
                // 跳转前收起移动端菜单
                HostCall::Navigate { .. } if self.state.mobile_menu_open => {
                    self.set_drawer(MOBILE_MENU, false);
                }
                HostCall::ToggleTheme => {
                    self.state.dark_mode = !self.state.dark_mode;
                }
                other => {
                    self.view.apply(other);
                }
            }
            tracing::debug!(call = ?call, "shell event");
            self.host.dispatch(call);
        }

        calls.len()
    }

    /// 渲染外壳并组合页面
    pub fn render(&self, page: &PageData, data: &DataMap) -> RenderResult<RenderNode> {
        let global = self.global_data(data);
        let handlers = self.handlers();
        let content = PageComposer::new(self.options.clone(), &self.view).render(page, &global, &handlers)?;
        self.wrap_with(vec![content], &global, &handlers)
    }

    /// 用全局区域包裹任意页面内容
    pub fn wrap(&self, content: Vec<RenderNode>, data: &DataMap) -> RenderResult<RenderNode> {
        let global = self.global_data(data);
        let handlers = self.handlers();
        self.wrap_with(content, &global, &handlers)
    }

    fn wrap_with(&self, content: Vec<RenderNode>, global: &Scope, handlers: &Handlers) -> RenderResult<RenderNode> {
        let renderer = BlockRenderer::new(self.options.clone(), &self.view);
        let sections = &self.theme.global_sections;

        let mut root = ElementNode::new("theme-shell", "div");
        root.classes.push("theme-shell".to_string());
        if self.state.dark_mode {
            root.classes.push("dark".to_string());
        }
        if !self.theme.id.is_empty() {
            root.attrs.insert("data-theme".to_string(), self.theme.id.clone());
        }

        for (name, tag, section) in [
            ("announcement", "div", sections.announcement.as_ref()),
            ("header", "header", sections.header.as_ref()),
        ] {
            if let Some(node) = render_region(&renderer, name, tag, section, global, handlers)? {
                root.children.push(node);
            }
        }

        let mut main = ElementNode::new("main", "main");
        main.children = content;
        root.children.push(RenderNode::Element(main));

        if let Some(node) = render_region(&renderer, "footer", "footer", sections.footer.as_ref(), global, handlers)? {
            root.children.push(node);
        }

        for (open, target) in [(self.state.mobile_menu_open, MOBILE_MENU), (self.state.cart_drawer_open, CART_DRAWER)] {
            if open {
                root.children.push(overlay(target, global, handlers));
            }
        }

        Ok(RenderNode::Element(root))
    }
}

/// 固定顺序的全局区域
fn regions(theme: &ThemeData) -> Vec<(&'static str, &GlobalSection)> {
    let sections = &theme.global_sections;
    [
        ("announcement", sections.announcement.as_ref()),
        ("header", sections.header.as_ref()),
        ("footer", sections.footer.as_ref()),
    ]
    .into_iter()
    .filter_map(|(name, section)| section.map(|s| (name, s)))
    .collect()
}

/// 启用且有区块时才渲染；区域作用域 = 全局数据 + 区域 settings
fn render_region(
    renderer: &BlockRenderer<'_>,
    name: &str,
    tag: &str,
    section: Option<&GlobalSection>,
    global: &Scope,
    handlers: &Handlers,
) -> RenderResult<Option<RenderNode>> {
    let Some(section) = section.filter(|s| s.is_renderable()) else {
        return Ok(None);
    };

    let _span = tracing::debug_span!("region", region = name).entered();
    let scope = merge_scope(global, Some(&section.settings));
    let context: Scope = Arc::new(DataMap::new());

    let mut element = ElementNode::new(name, tag);
    element.classes.push(format!("region-{}", name));
    element.attrs.insert("data-region".to_string(), name.to_string());
    element.children = renderer.render_blocks(&section.blocks, &scope, &context, handlers)?;
    Ok(Some(RenderNode::Element(element)))
}

/// 抽屉遮罩，点击即关闭
fn overlay(target: &str, global: &Scope, handlers: &Handlers) -> RenderNode {
    let spec = EventSpec::new("toggle_drawer", Some(target));
    let context: Scope = Arc::new(DataMap::new());

    let mut element = ElementNode::new(format!("{}-overlay", target), "div");
    element.classes = vec!["overlay".to_string(), format!("overlay-{}", target.replace('_', "-"))];
    element.style.insert("cursor".to_string(), JsonValue::from("pointer"));
    element.events.push(EventBinding {
        trigger: Trigger::Click,
        action: spec.action.clone(),
        callback: EventCallback::build(&spec, global, &context, handlers),
    });
    RenderNode::Element(element)
}

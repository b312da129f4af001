//! 事件系统 - 声明式意图到宿主处理函数的分发表

use crate::error::Diagnostic;
use crate::parser::binding::{is_truthy, resolve, value_to_string};
use crate::parser::{EventSpec, Scope};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 声明式动作名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Navigate,
    ToggleDrawer,
    ToggleTheme,
    Search,
    SliderPrev,
    SliderNext,
    SliderGoto,
    ToggleAccordion,
    ToggleDropdown,
    SetStyle,
    /// marquee 悬停暂停 / 恢复
    SetPaused,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Navigate,
        Action::ToggleDrawer,
        Action::ToggleTheme,
        Action::Search,
        Action::SliderPrev,
        Action::SliderNext,
        Action::SliderGoto,
        Action::ToggleAccordion,
        Action::ToggleDropdown,
        Action::SetStyle,
        Action::SetPaused,
    ];

    /// schema 中的动作名
    pub fn name(self) -> &'static str {
        match self {
            Action::Navigate => "navigate",
            Action::ToggleDrawer => "toggle_drawer",
            Action::ToggleTheme => "toggle_theme",
            Action::Search => "search",
            Action::SliderPrev => "slider_prev",
            Action::SliderNext => "slider_next",
            Action::SliderGoto => "slider_goto",
            Action::ToggleAccordion => "toggle_accordion",
            Action::ToggleDropdown => "toggle_dropdown",
            Action::SetStyle => "set_style",
            Action::SetPaused => "set_paused",
        }
    }
}

impl FromStr for Action {
    type Err = Diagnostic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| Diagnostic::UnknownEventAction { action: s.to_string() })
    }
}

/// 交给宿主的一次调用，参数已在分发时解析
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HostCall {
    Navigate { url: String },
    ToggleDrawer { target: String },
    ToggleTheme,
    Search { query: String },
    SliderPrev { target: String },
    SliderNext { target: String },
    /// target 为空表示所在的轮播
    SliderGoto { target: String, index: usize },
    ToggleAccordion { target: String },
    ToggleDropdown { target: String },
    SetStyle { target: String, value: JsonValue },
    SetPaused { target: String, paused: bool },
}

impl HostCall {
    pub fn action(&self) -> Action {
        match self {
            HostCall::Navigate { .. } => Action::Navigate,
            HostCall::ToggleDrawer { .. } => Action::ToggleDrawer,
            HostCall::ToggleTheme => Action::ToggleTheme,
            HostCall::Search { .. } => Action::Search,
            HostCall::SliderPrev { .. } => Action::SliderPrev,
            HostCall::SliderNext { .. } => Action::SliderNext,
            HostCall::SliderGoto { .. } => Action::SliderGoto,
            HostCall::ToggleAccordion { .. } => Action::ToggleAccordion,
            HostCall::ToggleDropdown { .. } => Action::ToggleDropdown,
            HostCall::SetStyle { .. } => Action::SetStyle,
            HostCall::SetPaused { .. } => Action::SetPaused,
        }
    }
}

pub type HostHandler = Arc<dyn Fn(&HostCall) + Send + Sync>;

/// 宿主处理函数表，引擎只按名字调用，从不实现
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<Action, HostHandler>,
}

/// 渲染时传递的共享分发表
pub type Handlers = Arc<HandlerTable>;

impl HandlerTable {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// 注册处理函数（同名覆盖）
    pub fn on<F>(mut self, action: Action, callback: F) -> Self
    where
        F: Fn(&HostCall) + Send + Sync + 'static,
    {
        self.handlers.insert(action, Arc::new(callback));
        self
    }

    pub fn insert(&mut self, action: Action, handler: HostHandler) {
        self.handlers.insert(action, handler);
    }

    pub fn get(&self, action: Action) -> Option<&HostHandler> {
        self.handlers.get(&action)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.handlers.contains_key(&action)
    }

    /// 在当前表上叠加另一张表，overlay 中的同名处理函数优先
    pub fn overlay(&self, overlay: HandlerTable) -> HandlerTable {
        let mut handlers = self.handlers.clone();
        handlers.extend(overlay.handlers);
        HandlerTable { handlers }
    }

    /// 分发调用；没有注册对应处理函数时返回 false
    pub fn dispatch(&self, call: &HostCall) -> bool {
        match self.handlers.get(&call.action()) {
            Some(handler) => {
                handler(call);
                true
            }
            None => {
                tracing::debug!(action = ?call.action(), "no host handler registered");
                false
            }
        }
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.handlers.keys().collect();
        actions.sort_by_key(|a| format!("{:?}", a));
        f.debug_struct("HandlerTable").field("actions", &actions).finish()
    }
}

/// 宿主交互类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Click,
    MouseEnter,
    MouseLeave,
    Submit,
}

impl FromStr for Trigger {
    type Err = Diagnostic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "click" | "on_click" => Trigger::Click,
            "hover" | "on_hover" | "mouse_enter" | "on_mouse_enter" => Trigger::MouseEnter,
            "mouse_leave" | "on_mouse_leave" => Trigger::MouseLeave,
            "submit" | "on_submit" => Trigger::Submit,
            _ => return Err(Diagnostic::UnknownTrigger { trigger: s.to_string() }),
        })
    }
}

/// 可分发的回调。payload 在 invoke 时才解析
#[derive(Clone)]
pub struct EventCallback {
    action: Option<Action>,
    /// 引擎自身发出的调用，不再解析 spec
    fixed: Option<HostCall>,
    spec: EventSpec,
    data: Scope,
    context: Scope,
    handlers: Handlers,
}

impl EventCallback {
    /// 根据事件描述构建回调；未知动作得到空操作回调并记录诊断
    pub fn build(spec: &EventSpec, data: &Scope, context: &Scope, handlers: &Handlers) -> Self {
        let action = match spec.action.parse::<Action>() {
            Ok(action) => Some(action),
            Err(diagnostic) => {
                diagnostic.emit();
                None
            }
        };
        Self {
            action,
            fixed: None,
            spec: spec.clone(),
            data: Arc::clone(data),
            context: Arc::clone(context),
            handlers: Arc::clone(handlers),
        }
    }

    /// 固定的宿主调用，target 不当作绑定解析
    pub fn fixed(call: HostCall, handlers: &Handlers) -> Self {
        let action = call.action();
        let empty: Scope = Arc::new(crate::parser::DataMap::new());
        Self {
            action: Some(action),
            spec: EventSpec::new(action.name(), None),
            fixed: Some(call),
            data: Arc::clone(&empty),
            context: empty,
            handlers: Arc::clone(handlers),
        }
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn is_noop(&self) -> bool {
        self.action.is_none()
    }

    /// 解析出本次要交给宿主的调用
    pub fn host_call(&self) -> Option<HostCall> {
        let action = self.action?;
        if let Some(call) = &self.fixed {
            return Some(call.clone());
        }
        let target = self.resolved_target();
        Some(match action {
            Action::Navigate => HostCall::Navigate { url: target },
            Action::ToggleDrawer => HostCall::ToggleDrawer { target },
            Action::ToggleTheme => HostCall::ToggleTheme,
            Action::Search => HostCall::Search { query: target },
            Action::SliderPrev => HostCall::SliderPrev { target },
            Action::SliderNext => HostCall::SliderNext { target },
            Action::SliderGoto => self.slider_goto(target),
            Action::ToggleAccordion => HostCall::ToggleAccordion { target },
            Action::ToggleDropdown => HostCall::ToggleDropdown { target },
            Action::SetStyle => HostCall::SetStyle { target, value: self.resolved_value() },
            Action::SetPaused => HostCall::SetPaused { target, paused: is_truthy(&self.resolved_value()) },
        })
    }

    /// 触发回调（fire-and-forget）
    pub fn invoke(&self) {
        if let Some(call) = self.host_call() {
            self.handlers.dispatch(&call);
        }
    }

    /// target 当作绑定解析，解析不到时按字面量使用
    fn resolved_target(&self) -> String {
        let Some(expr) = self.spec.target_expr() else {
            return String::new();
        };
        match resolve(expr, &self.data, &self.context) {
            Some(JsonValue::Null) | None => expr.to_string(),
            Some(value) => value_to_string(value),
        }
    }

    /// 下标取自 value；没有 value 时数字形式的 target 视为下标
    fn slider_goto(&self, target: String) -> HostCall {
        match self.resolved_value_raw() {
            Some(JsonValue::Number(n)) => HostCall::SliderGoto { target, index: n.as_f64().unwrap_or(0.0).max(0.0) as usize },
            Some(JsonValue::String(s)) if s.trim().parse::<usize>().is_ok() => {
                HostCall::SliderGoto { target, index: s.trim().parse().unwrap_or(0) }
            }
            _ => match target.trim().parse::<usize>() {
                Ok(index) => HostCall::SliderGoto { target: String::new(), index },
                Err(_) => HostCall::SliderGoto { target, index: 0 },
            },
        }
    }

    fn resolved_value_raw(&self) -> Option<JsonValue> {
        let value = self.spec.value_expr()?;
        if let JsonValue::String(expr) = value {
            if let Some(bound) = resolve(expr, &self.data, &self.context) {
                return Some(bound.clone());
            }
        }
        Some(value.clone())
    }

    fn resolved_value(&self) -> JsonValue {
        self.resolved_value_raw().unwrap_or(JsonValue::Null)
    }
}

impl fmt::Debug for EventCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCallback")
            .field("action", &self.action)
            .field("spec", &self.spec)
            .field("fixed", &self.fixed)
            .finish()
    }
}

/// 渲染节点上挂载的事件
#[derive(Debug, Clone, Serialize)]
pub struct EventBinding {
    pub trigger: Trigger,
    pub action: String,
    #[serde(skip)]
    pub callback: EventCallback,
}

impl EventBinding {
    pub fn invoke(&self) {
        self.callback.invoke();
    }
}

impl PartialEq for EventBinding {
    fn eq(&self, other: &Self) -> bool {
        self.trigger == other.trigger
            && self.action == other.action
            && self.callback.spec == other.callback.spec
            && self.callback.fixed == other.callback.fixed
    }
}

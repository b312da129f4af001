//! 单元测试模块
//! 覆盖 schema 解析、区块渲染、特殊组件、事件分发、页面组合

pub mod renderer_tests;
pub mod component_tests;

use crate::event::{Action, HandlerTable, Handlers, HostCall};
use crate::parser::{scope_from, Block, Scope};
use crate::renderer::{BlockRenderer, RenderNode, ViewState};
use crate::RenderOptions;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};

/// 辅助函数：从 JSON 加载区块
pub fn block(value: JsonValue) -> Block {
    Block::from_value(value).expect("valid block schema")
}

pub fn scope(value: JsonValue) -> Scope {
    scope_from(value)
}

pub fn empty_scope() -> Scope {
    scope_from(serde_json::json!({}))
}

pub fn no_handlers() -> Handlers {
    Arc::new(HandlerTable::new())
}

/// 记录所有宿主调用的分发表
pub fn recorder() -> (Handlers, Arc<Mutex<Vec<HostCall>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut table = HandlerTable::new();
    for action in Action::ALL {
        let calls = Arc::clone(&calls);
        table.insert(action, Arc::new(move |call: &HostCall| calls.lock().unwrap().push(call.clone())));
    }
    (Arc::new(table), calls)
}

/// 用默认配置和空 ViewState 渲染
pub fn render(block: &Block, data: JsonValue) -> Option<RenderNode> {
    let state = ViewState::new();
    render_with_state(block, data, &state)
}

pub fn render_with_state(block: &Block, data: JsonValue, state: &ViewState) -> Option<RenderNode> {
    BlockRenderer::new(RenderOptions::default(), state)
        .render(block, &scope(data), &empty_scope(), &no_handlers())
        .expect("render should not fail")
}

/// 取出元素节点，不是元素时直接失败
pub fn element(node: &RenderNode) -> &crate::renderer::node::ElementNode {
    node.as_element().expect("expected element node")
}

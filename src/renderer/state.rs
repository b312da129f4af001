//! 视图状态 - 由调用方持有，渲染器只读

use crate::event::HostCall;
use crate::parser::{Block, BlockKind, DataMap};
use serde_json::Value as JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 组件级的瞬时 UI 状态（可见性、轮播位置、动画暂停）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// 区块 id → 是否可见
    pub visibility: BTreeMap<String, bool>,
    /// 轮播 id → 当前索引
    pub carousels: BTreeMap<String, usize>,
    /// 已暂停的 marquee id
    pub paused: BTreeSet<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 收集区块树里声明了 `state.visible` 的默认可见性
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut state = Self::new();
        state.register_defaults(blocks);
        state
    }

    /// 登记默认值，已有的覆盖值保持不变
    pub fn register_defaults(&mut self, blocks: &[Block]) {
        for block in blocks {
            if let (Some(id), Some(visible)) = (block.state_id(), block.state.as_ref().and_then(|s| s.visible)) {
                self.visibility.entry(id.to_string()).or_insert(visible);
            }
            self.register_defaults(&block.blocks);
            if let BlockKind::Repeater(spec) = &block.kind {
                if let Some(template) = spec.template.as_deref() {
                    self.register_defaults(std::slice::from_ref(template));
                }
            }
        }
    }

    pub fn visibility(&self, id: &str) -> Option<bool> {
        self.visibility.get(id).copied()
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        self.visibility.insert(id.to_string(), visible);
    }

    /// 翻转可见性；未登记的区块视为当前可见
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let visible = !self.visibility(id).unwrap_or(true);
        self.set_visible(id, visible);
        visible
    }

    /// 条件里可用的 `_drawer.<id>`
    pub fn drawer_states(&self) -> DataMap {
        self.visibility
            .iter()
            .map(|(id, visible)| (id.clone(), JsonValue::Bool(*visible)))
            .collect()
    }

    pub fn carousel_index(&self, id: &str) -> usize {
        self.carousels.get(id).copied().unwrap_or(0)
    }

    pub fn set_carousel_index(&mut self, id: &str, index: usize) {
        self.carousels.insert(id.to_string(), index);
    }

    pub fn is_paused(&self, id: &str) -> bool {
        self.paused.contains(id)
    }

    pub fn set_paused(&mut self, id: &str, paused: bool) {
        if paused {
            self.paused.insert(id.to_string());
        } else {
            self.paused.remove(id);
        }
    }

    /// 应用一次宿主调用，返回状态是否变化
    pub fn apply(&mut self, call: &HostCall) -> bool {
        match call {
            HostCall::ToggleDrawer { target }
            | HostCall::ToggleAccordion { target }
            | HostCall::ToggleDropdown { target }
                if !target.is_empty() =>
            {
                self.toggle_visibility(target);
                true
            }
            HostCall::SetPaused { target, paused } if !target.is_empty() => {
                let changed = self.is_paused(target) != *paused;
                self.set_paused(target, *paused);
                changed
            }
            HostCall::SliderGoto { target, index } if !target.is_empty() => {
                let changed = self.carousel_index(target) != *index;
                self.set_carousel_index(target, *index);
                changed
            }
            _ => false,
        }
    }
}

//! 区块 schema、绑定表达式与条件解析

pub mod binding;
pub mod block;
pub mod condition;
pub mod page;
pub mod template;
pub mod wrapper;

pub use binding::{resolve, resolve_string, value_to_string};
pub use block::{Block, BlockKind, BlockState, EventSpec, MarqueeSpec, RepeaterSpec};
pub use condition::{Condition, Operator};
pub use page::{ApiEnvelope, GlobalSection, GlobalSections, GlobalSettings, PageData, PageSection, Seo, ThemeData};
pub use template::TemplateEngine;
pub use wrapper::Wrapper;

use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// 键值数据表
pub type DataMap = Map<String, JsonValue>;

/// 一次渲染中共享的只读数据作用域
pub type Scope = Arc<DataMap>;

/// `{...base, ...local}` 浅合并，local 中的键优先；没有 local 时直接共享 base
pub fn merge_scope(base: &Scope, local: Option<&DataMap>) -> Scope {
    match local {
        Some(local) if !local.is_empty() => {
            let mut merged = (**base).clone();
            for (key, value) in local {
                merged.insert(key.clone(), value.clone());
            }
            Arc::new(merged)
        }
        _ => Arc::clone(base),
    }
}

/// 把 JSON 对象转成 Scope，非对象视为空作用域
pub fn scope_from(value: JsonValue) -> Scope {
    match value {
        JsonValue::Object(map) => Arc::new(map),
        _ => Arc::new(DataMap::new()),
    }
}

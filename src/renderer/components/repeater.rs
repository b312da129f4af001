//! Repeater - 对数组中的每一项展开一次模板

use super::ComponentContext;
use crate::error::{Diagnostic, RenderResult};
use crate::parser::binding::{resolve, value_to_string};
use crate::parser::{Block, DataMap, RepeaterSpec, Scope};
use crate::renderer::node::RenderNode;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub struct RepeaterComponent;

impl RepeaterComponent {
    pub(crate) fn build(
        block: &Block,
        spec: &RepeaterSpec,
        index: usize,
        ctx: &ComponentContext<'_, '_>,
    ) -> RenderResult<Option<RenderNode>> {
        let (Some(source), Some(template)) = (spec.source.as_deref(), spec.template.as_deref()) else {
            Diagnostic::MissingRepeaterInputs.emit();
            return Ok(None);
        };

        let Some(items) = Self::resolve_source(source, ctx.scope, ctx.context) else {
            if ctx.renderer.options().dev_diagnostics {
                Diagnostic::NonArraySource { path: source.to_string() }.emit();
            }
            return Ok(None);
        };

        let mut children = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let key = Self::item_key(&spec.iterator, item, i);
            let item_context = Self::iteration_context(ctx.context, spec, item, i);
            let item_frame = ctx.frame.child(&key);
            let rendered = ctx
                .renderer
                .render_node(template, i, ctx.scope, &item_context, ctx.handlers, &item_frame)?;
            if let Some(mut node) = rendered {
                node.set_key(key);
                children.push(node);
            }
        }

        Ok(Some(RenderNode::fragment(block.key(index), children)))
    }

    /// 依次尝试：绑定路径 → scope 顶层键 → context 顶层键
    fn resolve_source<'a>(source: &str, scope: &'a DataMap, context: &'a DataMap) -> Option<&'a Vec<JsonValue>> {
        resolve(source, scope, context)
            .and_then(JsonValue::as_array)
            .or_else(|| scope.get(source).and_then(JsonValue::as_array))
            .or_else(|| context.get(source).and_then(JsonValue::as_array))
    }

    /// `{...context, [iterator]: item, [index]: i}`，只在本次迭代的子树内可见
    fn iteration_context(context: &Scope, spec: &RepeaterSpec, item: &JsonValue, i: usize) -> Scope {
        let mut next = (**context).clone();
        next.insert(spec.iterator.clone(), item.clone());
        if let Some(index_name) = &spec.index {
            next.insert(index_name.clone(), JsonValue::from(i));
        }
        Arc::new(next)
    }

    /// 稳定标识：item.id → label/name/url + 下标 → 迭代变量名 + 下标
    fn item_key(iterator: &str, item: &JsonValue, i: usize) -> String {
        let field = |name: &str| {
            item.get(name)
                .filter(|v| !v.is_null())
                .map(value_to_string)
                .filter(|s| !s.is_empty())
        };

        if let Some(id) = field("id") {
            return format!("{}-{}", iterator, id);
        }
        if let Some(readable) = field("label").or_else(|| field("name")).or_else(|| field("url")) {
            return format!("{}-{}-{}", iterator, readable, i);
        }
        format!("{}-{}", iterator, i)
    }
}

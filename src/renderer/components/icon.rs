//! icon 组件 - 图标
//!
//! 名称先转小写、`-` 换成 `_`，再查别名表得到规范图标名：
//! - cart / shopping_cart → shopping-cart
//! - close / x → x
//! - dark_mode / moon → moon
//!
//! 表中没有的名称原样输出。

use super::ComponentContext;
use crate::event::Trigger;
use crate::parser::binding::resolve_string;
use crate::parser::Block;
use crate::renderer::node::{IconNode, RenderNode};
use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// 缺省图标
pub const FALLBACK_ICON: &str = "help";

static ICON_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&str, &[&str])] = &[
        ("search", &["search"]),
        ("menu", &["menu"]),
        ("x", &["close", "x"]),
        ("chevron-down", &["chevron_down"]),
        ("chevron-up", &["chevron_up"]),
        ("chevron-left", &["chevron_left"]),
        ("chevron-right", &["chevron_right"]),
        ("arrow-right", &["arrow_right"]),
        ("arrow-left", &["arrow_left"]),
        ("home", &["home"]),
        ("shopping-cart", &["shopping_cart", "cart"]),
        ("shopping-bag", &["shopping_bag", "bag"]),
        ("heart", &["heart", "wishlist"]),
        ("tag", &["tag"]),
        ("percent", &["percent"]),
        ("gift", &["gift"]),
        ("truck", &["truck", "delivery"]),
        ("credit-card", &["credit_card", "payment"]),
        ("shield", &["shield", "secure"]),
        ("user", &["user", "account", "profile"]),
        ("moon", &["moon", "dark_mode"]),
        ("sun", &["sun", "light_mode"]),
        ("phone", &["phone", "call"]),
        ("mail", &["mail", "email"]),
        ("map-pin", &["map_pin", "location"]),
        ("globe", &["globe", "language"]),
        ("facebook", &["facebook"]),
        ("instagram", &["instagram"]),
        ("twitter", &["twitter"]),
        ("youtube", &["youtube"]),
        ("linkedin", &["linkedin"]),
        ("github", &["github"]),
        ("play", &["play"]),
        ("pause", &["pause"]),
        ("volume-2", &["volume"]),
        ("volume-x", &["volume_mute"]),
        ("eye", &["eye"]),
        ("eye-off", &["eye_off"]),
        ("check", &["check", "checkmark"]),
        ("plus", &["plus", "add"]),
        ("minus", &["minus", "remove"]),
        ("edit", &["edit", "pencil"]),
        ("trash-2", &["trash", "delete"]),
        ("copy", &["copy"]),
        ("share-2", &["share", "share2"]),
        ("send", &["send"]),
        ("download", &["download"]),
        ("upload", &["upload"]),
        ("refresh-cw", &["refresh", "reload"]),
        ("settings", &["settings"]),
        ("filter", &["filter"]),
        ("star", &["star", "rating"]),
        ("clock", &["clock", "time"]),
        ("calendar", &["calendar", "date"]),
        ("alert-circle", &["alert", "warning"]),
        ("info", &["info"]),
        ("help-circle", &["help", "question"]),
        ("grid", &["grid"]),
        ("layout-grid", &["grid_view"]),
        ("list", &["list", "list_view"]),
        ("rotate-ccw", &["rotate_ccw", "return", "refund", "money_back"]),
        ("messages-square", &["messages_square", "chat", "support", "customer_support"]),
        ("badge-check", &["badge_check", "verified", "quality"]),
        ("shield-check", &["shield_check", "warranty", "protection"]),
        ("headphones", &["headphones", "customer_service"]),
    ];

    groups
        .iter()
        .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*alias, *canonical)))
        .collect()
});

/// 规范化图标名；未知名称原样返回
pub fn canonical_name(name: &str) -> String {
    let normalized = name.trim().to_lowercase().replace('-', "_");
    match ICON_ALIASES.get(normalized.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => {
            tracing::debug!(icon = name, "icon not in alias table");
            name.trim().to_string()
        }
    }
}

pub struct IconComponent;

impl IconComponent {
    /// 名称来源：bind_icon → icon → help
    pub(crate) fn build(block: &Block, index: usize, ctx: &ComponentContext<'_, '_>) -> RenderNode {
        let renderer = ctx.renderer;
        let name = block
            .bind_icon
            .as_deref()
            .and_then(|path| resolve_string(path, ctx.scope, ctx.context))
            .filter(|n| !n.trim().is_empty())
            .or_else(|| block.icon.clone().filter(|n| !n.trim().is_empty()))
            .unwrap_or_else(|| FALLBACK_ICON.to_string());

        let events = renderer.bind_events(block, ctx.scope, ctx.context, ctx.handlers);
        let mut style = renderer.style(block, ctx.scope, ctx.context);
        if events.iter().any(|e| e.trigger == Trigger::Click) {
            style.insert("cursor".to_string(), JsonValue::from("pointer"));
        }

        RenderNode::Icon(IconNode {
            key: block.key(index),
            name: canonical_name(&name),
            size: block.icon_size,
            id: renderer.element_id(block, ctx.scope, ctx.context),
            classes: ctx.classes(block, None),
            style,
            events,
        })
    }
}

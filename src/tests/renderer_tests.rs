//! 渲染器单元测试
//! 测试普通元素渲染、条件剪枝、样式解析、属性和事件绑定

use super::{block, element, empty_scope, recorder, render, render_with_state, scope};
use crate::error::RenderError;
use crate::event::{HostCall, Trigger};
use crate::renderer::{BlockRenderer, RenderNode, ViewState};
use crate::RenderOptions;
use serde_json::{json, Value as JsonValue};

/// 测试基本渲染
#[test]
fn test_basic_element() {
    let node = render(
        &block(json!({ "wrapper": "section#hero.container", "class": "dark wide", "content": "Hi" })),
        json!({}),
    )
    .expect("rendered");

    let el = element(&node);
    assert_eq!(el.tag, "section");
    assert_eq!(el.id.as_deref(), Some("hero"));
    assert_eq!(el.key, "hero");
    assert_eq!(el.classes, vec!["container", "dark", "wide"]);
    assert_eq!(node.text_content(), "Hi");
}

#[test]
fn test_bound_content_overrides_literal() {
    let heading = block(json!({ "wrapper": "h1", "content": "fallback", "bind_content": "title" }));
    assert_eq!(render(&heading, json!({ "title": "Real" })).unwrap().text_content(), "Real");
    assert_eq!(render(&heading, json!({})).unwrap().text_content(), "fallback");
    assert_eq!(render(&heading, json!({ "title": null })).unwrap().text_content(), "fallback");
}

#[test]
fn test_literal_content_interpolation() {
    let greeting = block(json!({ "wrapper": "p", "content": "Hello {{user.name}}!" }));
    let node = render(&greeting, json!({ "user": { "name": "Ann" } })).unwrap();
    assert_eq!(node.text_content(), "Hello Ann!");
}

/// 条件不成立时整棵子树被剪除，子树中的事件不会被构建
#[test]
fn test_false_condition_prunes_subtree() {
    let (handlers, calls) = recorder();
    let gated = block(json!({
        "wrapper": "div",
        "condition": { "field": "show", "operator": "==", "value": true },
        "blocks": [
            { "wrapper": "span", "bind_content": "deeply.missing.path" },
            { "type": "repeater" },
            { "wrapper": "button", "events": { "click": { "action": "not_a_real_action" } } }
        ]
    }));
    let state = ViewState::new();
    let renderer = BlockRenderer::new(RenderOptions::default(), &state);

    let result = renderer.render(&gated, &scope(json!({ "show": false })), &empty_scope(), &handlers).unwrap();
    assert!(result.is_none());
    assert!(calls.lock().unwrap().is_empty());

    let shown = renderer.render(&gated, &scope(json!({ "show": true })), &empty_scope(), &handlers).unwrap();
    assert!(shown.is_some());
}

#[test]
fn test_false_condition_on_child_only() {
    let parent = block(json!({
        "wrapper": "ul",
        "blocks": [
            { "wrapper": "li", "content": "always" },
            { "wrapper": "li", "content": "vip", "condition": { "field": "vip", "operator": "exists" } }
        ]
    }));
    let node = render(&parent, json!({})).unwrap();
    assert_eq!(node.children().len(), 1);
    assert_eq!(node.text_content(), "always");
}

/// 区块自己的 data 覆盖继承数据，未覆盖的键仍可见
#[test]
fn test_block_data_shadows_parent() {
    let card = block(json!({
        "wrapper": "div",
        "data": { "title": "inner" },
        "blocks": [
            { "wrapper": "h2", "bind_content": "title" },
            { "wrapper": "p", "bind_content": "subtitle" }
        ]
    }));
    let node = render(&card, json!({ "title": "outer", "subtitle": "kept" })).unwrap();
    assert_eq!(node.children()[0].text_content(), "inner");
    assert_eq!(node.children()[1].text_content(), "kept");
}

#[test]
fn test_image_attributes() {
    let image = block(json!({ "wrapper": "img.logo", "bind_src": "brand.logo", "alt": "Logo", "content": "ignored" }));
    let node = render(&image, json!({ "brand": { "logo": "/logo.png" } })).unwrap();
    let el = element(&node);
    assert_eq!(el.attrs.get("src").map(String::as_str), Some("/logo.png"));
    assert_eq!(el.attrs.get("alt").map(String::as_str), Some("Logo"));
    assert!(el.children.is_empty());

    // 空 src 使用占位图，元素保留
    let node = render(&image, json!({ "brand": { "logo": "" } })).unwrap();
    assert_eq!(element(&node).attrs.get("src").map(String::as_str), Some("/placeholder-product.svg"));

    // engine.json 中可覆盖占位图，其余字段保持默认
    let options: RenderOptions = serde_json::from_value(json!({ "placeholder_image": "/missing.png" })).unwrap();
    assert_eq!(options.max_depth, RenderOptions::default().max_depth);
    let state = ViewState::new();
    let node = BlockRenderer::new(options, &state)
        .render(&image, &scope(json!({})), &empty_scope(), &super::no_handlers())
        .unwrap()
        .unwrap();
    assert_eq!(element(&node).attrs.get("src").map(String::as_str), Some("/missing.png"));
}

#[test]
fn test_link_and_input_attributes() {
    let link = block(json!({ "wrapper": "a", "content": "Shop" }));
    let node = render(&link, json!({})).unwrap();
    assert_eq!(element(&node).attrs.get("href").map(String::as_str), Some("#"));

    let bound_link = block(json!({ "wrapper": "a", "bind_href": "product.url", "href": "/fallback" }));
    let node = render(&bound_link, json!({ "product": { "url": "/p/1" } })).unwrap();
    assert_eq!(element(&node).attrs.get("href").map(String::as_str), Some("/p/1"));

    let input = block(json!({ "wrapper": "input", "type": "text_input", "placeholder": "Search...", "aria_label": "Search" }));
    let node = render(&input, json!({})).unwrap();
    let el = element(&node);
    assert_eq!(el.attrs.get("type").map(String::as_str), Some("text"));
    assert_eq!(el.attrs.get("placeholder").map(String::as_str), Some("Search..."));
    assert_eq!(el.attrs.get("aria-label").map(String::as_str), Some("Search"));
    assert!(el.attrs.get("src").is_none());
}

/// href 来源依次为 bind_href、bind_url、href、url、点击跳转目标
#[test]
fn test_link_href_fallbacks() {
    let href = |schema: JsonValue, data: JsonValue| {
        let node = render(&block(schema), data).unwrap();
        element(&node).attrs.get("href").cloned().unwrap_or_default()
    };

    assert_eq!(href(json!({ "wrapper": "a", "bind_url": "item.url", "href": "/x" }), json!({ "item": { "url": "/sale" } })), "/sale");
    assert_eq!(href(json!({ "wrapper": "a", "url": "/about" }), json!({})), "/about");
    // bind_href 只接受字符串
    assert_eq!(href(json!({ "wrapper": "a", "bind_href": "item.id", "url": "/u" }), json!({ "item": { "id": 7 } })), "/u");

    let nav = json!({ "wrapper": "a", "events": { "on_click": { "action": "navigate", "target": "/cart" } } });
    assert_eq!(href(nav, json!({})), "/cart");
    let bound_nav = json!({ "wrapper": "a", "events": { "click": { "action": "navigate", "target": "item.link" } } });
    assert_eq!(href(bound_nav.clone(), json!({ "item": { "link": "/p/9" } })), "/p/9");
    assert_eq!(href(bound_nav, json!({})), "#");
    let search = json!({ "wrapper": "a", "events": { "click": { "action": "search", "target": "/search" } } });
    assert_eq!(href(search, json!({})), "#");
}

/// bind_id 同时决定节点 id 和可见性键
#[test]
fn test_bind_id_overrides_id() {
    let panel = block(json!({
        "wrapper": "div#static",
        "bind_id": "item.slug",
        "state": { "visible": true }
    }));
    let node = render(&panel, json!({ "item": { "slug": "faq-1" } })).unwrap();
    assert_eq!(element(&node).id.as_deref(), Some("faq-1"));

    let mut state = ViewState::new();
    state.set_visible("faq-1", false);
    let node = render_with_state(&panel, json!({ "item": { "slug": "faq-1" } }), &state).unwrap();
    assert_eq!(element(&node).style.get("display"), Some(&json!("none")));

    // 解析不到时退回静态 id
    let node = render_with_state(&panel, json!({ "item": { "slug": null } }), &state).unwrap();
    let el = element(&node);
    assert_eq!(el.id.as_deref(), Some("static"));
    assert!(el.style.get("display").is_none());
}

/// 没有 state 的区块不受 ViewState 可见性影响
#[test]
fn test_visibility_requires_state() {
    let plain = block(json!({ "wrapper": "div#menu", "content": "x" }));
    let mut state = ViewState::new();
    state.set_visible("menu", false);
    let node = render_with_state(&plain, json!({}), &state).unwrap();
    assert!(element(&node).style.get("display").is_none());
}

#[test]
fn test_style_resolution() {
    let styled = block(json!({
        "wrapper": "div",
        "style": {
            "background_color": "colors.primary",
            "border_color": "colors.missing",
            "padding": "8px",
            "opacity": 0.5,
            "margin": null
        }
    }));
    let node = render(&styled, json!({ "colors": { "primary": "#f00" } })).unwrap();
    let style = &element(&node).style;
    assert_eq!(style.get("background-color"), Some(&json!("#f00")));
    assert_eq!(style.get("border-color"), Some(&json!("colors.missing")));
    assert_eq!(style.get("padding"), Some(&json!("8px")));
    assert_eq!(style.get("opacity"), Some(&json!(0.5)));
    assert!(style.get("margin").is_none());
}

#[test]
fn test_bind_style_entries() {
    let styled = block(json!({
        "wrapper": "div",
        "bind_style": {
            "background": { "type": "gradient", "start": "slide.from", "end": "slide.to" },
            "width": { "expr": "progress / 2" },
            "opacity": { "field": "slide.alpha", "transform": "divide_100" },
            "height": { "field": "slide.height", "transform": "px" },
            "color": "slide.text",
            "border_color": "slide.unset"
        }
    }));
    let data = json!({ "slide": { "from": "#000", "to": "#fff", "alpha": 50, "height": 120, "text": "white" }, "progress": 80 });
    let node = render(&styled, data).unwrap();
    let style = &element(&node).style;
    assert_eq!(style.get("background"), Some(&json!("linear-gradient(to right, #000, #fff)")));
    assert_eq!(style.get("width"), Some(&json!(40)));
    assert_eq!(style.get("opacity"), Some(&json!(0.5)));
    assert_eq!(style.get("height"), Some(&json!("120px")));
    assert_eq!(style.get("color"), Some(&json!("white")));
    assert!(style.get("border-color").is_none());
}

/// state.visible = false 只追加 display: none，其他样式保留
#[test]
fn test_hidden_state_keeps_style() {
    let drawer = block(json!({
        "wrapper": "aside#drawer",
        "state": { "visible": false },
        "style": { "width": "300px" }
    }));
    let node = render(&drawer, json!({})).unwrap();
    let style = &element(&node).style;
    assert_eq!(style.get("display"), Some(&json!("none")));
    assert_eq!(style.get("width"), Some(&json!("300px")));

    let mut state = ViewState::from_blocks(std::slice::from_ref(&drawer));
    assert_eq!(state.visibility("drawer"), Some(false));
    state.toggle_visibility("drawer");
    let node = render_with_state(&drawer, json!({}), &state).unwrap();
    assert!(element(&node).style.get("display").is_none());
}

#[test]
fn test_click_event_dispatch() {
    let (handlers, calls) = recorder();
    let button = block(json!({
        "wrapper": "button",
        "content": "View",
        "events": { "click": { "action": "navigate", "target": "product.url" } }
    }));
    let state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&button, &scope(json!({ "product": { "url": "/p/1" } })), &empty_scope(), &handlers)
        .unwrap()
        .unwrap();

    let el = element(&node);
    assert_eq!(el.style.get("cursor"), Some(&json!("pointer")));
    el.event(Trigger::Click).expect("click binding").invoke();
    assert_eq!(*calls.lock().unwrap(), vec![HostCall::Navigate { url: "/p/1".to_string() }]);
}

#[test]
fn test_hover_and_unknown_events() {
    let (handlers, calls) = recorder();
    let card = block(json!({
        "wrapper": "div",
        "events": {
            "on_mouse_enter": { "action": "toggle_dropdown", "target": "menu" },
            "on_wheel": { "action": "navigate", "target": "/x" },
            "click": { "action": "explode" }
        }
    }));
    let state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&card, &empty_scope(), &empty_scope(), &handlers)
        .unwrap()
        .unwrap();

    let el = element(&node);
    // 未知触发类型被忽略
    assert_eq!(el.events.len(), 2);
    el.event(Trigger::Click).unwrap().invoke();
    assert!(calls.lock().unwrap().is_empty());
    el.event(Trigger::MouseEnter).unwrap().invoke();
    assert_eq!(*calls.lock().unwrap(), vec![HostCall::ToggleDropdown { target: "menu".to_string() }]);
}

#[test]
fn test_caller_class_and_bind_class() {
    let badge = block(json!({ "wrapper": "span.badge", "class": "badge small", "bind_class": "status" }));
    let state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render_with_class(&badge, "in-header", &scope(json!({ "status": "active" })), &empty_scope(), &super::no_handlers())
        .unwrap()
        .unwrap();
    assert_eq!(element(&node).classes, vec!["badge", "small", "in-header", "active"]);
}

/// 相同输入两次渲染结果逐字节一致，且不修改输入
#[test]
fn test_render_is_deterministic_and_pure() {
    let raw = json!({
        "wrapper": "div#root",
        "data": { "heading": "Deals" },
        "blocks": [
            { "wrapper": "h2", "bind_content": "heading" },
            { "type": "repeater", "source": "items", "index": "i", "template": { "wrapper": "li", "bind_content": "item.name" } },
            { "type": "marquee", "blocks": [{ "wrapper": "span", "content": "Free shipping" }] }
        ]
    });
    let tree = block(raw.clone());
    let data_value = json!({ "items": [{ "id": 1, "name": "A" }, { "id": 2, "name": "B" }] });
    let data = scope(data_value.clone());
    let context = scope(json!({ "locale": "en" }));
    let tree_before = tree.clone();

    let state = ViewState::new();
    let renderer = BlockRenderer::new(RenderOptions::default(), &state);
    let handlers = super::no_handlers();
    let first = renderer.render(&tree, &data, &context, &handlers).unwrap();
    let second = renderer.render(&tree, &data, &context, &handlers).unwrap();

    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    assert_eq!(tree, tree_before);
    assert_eq!(JsonValue::Object((*data).clone()), data_value);
    assert_eq!(JsonValue::Object((*context).clone()), json!({ "locale": "en" }));
}

#[test]
fn test_recursion_limit_is_loud() {
    let mut nested = json!({ "wrapper": "span", "content": "leaf" });
    for _ in 0..5 {
        nested = json!({ "wrapper": "div", "blocks": [nested] });
    }
    let tree = block(nested);
    let state = ViewState::new();

    let shallow = BlockRenderer::new(RenderOptions::default().with_max_depth(3), &state);
    let err = shallow.render(&tree, &empty_scope(), &empty_scope(), &super::no_handlers()).unwrap_err();
    assert!(matches!(err, RenderError::RecursionLimit { limit: 3, .. }));

    let deep = BlockRenderer::new(RenderOptions::default(), &state);
    let node = deep.render(&tree, &empty_scope(), &empty_scope(), &super::no_handlers()).unwrap().unwrap();
    assert_eq!(node.text_content(), "leaf");
}

#[test]
fn test_render_node_serializes_with_kind_tag() {
    let node = render(&block(json!({ "wrapper": "p", "content": "x" })), json!({})).unwrap();
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["kind"], json!("element"));
    assert_eq!(value["tag"], json!("p"));
    assert_eq!(value["children"][0], json!({ "kind": "text", "text": "x" }));
    assert!(matches!(node.children()[0], RenderNode::Text(_)));
}

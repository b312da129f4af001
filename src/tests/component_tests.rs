//! 组件单元测试
//! Repeater / Marquee / Swiper / Icon

use super::{block, element, empty_scope, no_handlers, recorder, render, render_with_state, scope};
use crate::event::{HostCall, Trigger};
use crate::renderer::components::{canonical_name, MarqueeComponent, SlideNav, SwiperConfig, COPIES, FALLBACK_ICON};
use crate::renderer::node::{Coverflow, PaginationKind, SlideLayout, SwiperEffect};
use crate::renderer::{BlockRenderer, RenderNode, ViewState};
use crate::RenderOptions;
use serde_json::json;

fn product_list() -> crate::parser::Block {
    block(json!({
        "type": "repeater",
        "source": "items",
        "iterator": "item",
        "template": { "wrapper": "li", "bind_content": "item.label" }
    }))
}

#[test]
fn test_repeater_keys_from_id() {
    let node = render(&product_list(), json!({ "items": [{ "id": 1, "label": "A" }, { "id": 2, "label": "B" }] }))
        .expect("rendered");

    let RenderNode::Fragment(fragment) = &node else {
        panic!("expected fragment, got {:?}", node);
    };
    let keys: Vec<_> = fragment.children.iter().filter_map(RenderNode::key).collect();
    assert_eq!(keys, vec!["item-1", "item-2"]);
    assert_eq!(node.text_content(), "AB");
}

/// 没有 id 时依次使用可读字段 + 下标、迭代变量名 + 下标
#[test]
fn test_repeater_key_fallbacks() {
    let node = render(&product_list(), json!({ "items": [{ "label": "A" }, { "name": "B" }, { "url": "/c" }, "plain"] }))
        .unwrap();
    let keys: Vec<_> = node.children().iter().filter_map(RenderNode::key).collect();
    assert_eq!(keys, vec!["item-A-0", "item-B-1", "item-/c-2", "item-3"]);
}

/// 插入新项后，已有项的 key 不变
#[test]
fn test_repeater_keys_stable_across_insertion() {
    let before = render(&product_list(), json!({ "items": [{ "id": "x" }, { "id": "y" }] })).unwrap();
    let after = render(&product_list(), json!({ "items": [{ "id": "new" }, { "id": "x" }, { "id": "y" }] })).unwrap();
    assert!(before.find_by_key("item-x").is_some());
    assert!(after.find_by_key("item-x").is_some());
    assert!(after.find_by_key("item-y").is_some());
}

#[test]
fn test_repeater_non_array_source() {
    assert!(render(&product_list(), json!({ "items": "not a list" })).is_none());
    assert!(render(&product_list(), json!({})).is_none());
    assert!(render(&product_list(), json!({ "items": { "a": 1 } })).is_none());
}

#[test]
fn test_repeater_missing_inputs() {
    assert!(render(&block(json!({ "type": "repeater", "source": "items" })), json!({ "items": [1] })).is_none());
    assert!(render(&block(json!({ "type": "repeater", "template": { "wrapper": "li" } })), json!({ "items": [1] })).is_none());
}

#[test]
fn test_repeater_index_and_context_source() {
    let numbered = block(json!({
        "type": "repeater",
        "source": "rows",
        "iterator": "row",
        "index": "i",
        "template": { "wrapper": "li", "content": "{{i}}:{{row}}" }
    }));
    let state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&numbered, &empty_scope(), &scope(json!({ "rows": ["a", "b"] })), &no_handlers())
        .unwrap()
        .unwrap();
    assert_eq!(node.text_content(), "0:a1:b");
}

/// 迭代变量不会泄漏到兄弟区块
#[test]
fn test_repeater_context_does_not_leak() {
    let list = block(json!({
        "wrapper": "div",
        "blocks": [
            { "type": "repeater", "source": "items", "template": { "wrapper": "span", "bind_content": "item.label" } },
            { "wrapper": "p", "content": "none", "bind_content": "item.label" }
        ]
    }));
    let node = render(&list, json!({ "items": [{ "label": "A" }] })).unwrap();
    // 父元素中 repeater 展开为普通子节点
    assert_eq!(node.children().len(), 2);
    assert_eq!(node.text_content(), "Anone");
}

#[test]
fn test_nested_repeaters() {
    let grid = block(json!({
        "type": "repeater",
        "source": "groups",
        "iterator": "group",
        "template": {
            "wrapper": "ul",
            "blocks": [{
                "type": "repeater",
                "source": "group.items",
                "iterator": "entry",
                "template": { "wrapper": "li", "bind_content": "entry" }
            }]
        }
    }));
    let node = render(&grid, json!({ "groups": [{ "id": "g1", "items": ["a", "b"] }, { "id": "g2", "items": ["c"] }] })).unwrap();
    assert_eq!(node.text_content(), "abc");
    assert_eq!(node.children().len(), 2);
    assert_eq!(node.children()[0].children().len(), 2);
}

/// 三份连续副本
#[test]
fn test_marquee_triplicates_content() {
    let ticker = block(json!({
        "type": "marquee",
        "id": "ticker",
        "blocks": [
            { "wrapper": "span", "content": "Sale" },
            { "wrapper": "span", "content": "Now" }
        ]
    }));
    let node = render(&ticker, json!({})).unwrap();
    let RenderNode::Marquee(marquee) = &node else {
        panic!("expected marquee, got {:?}", node);
    };

    assert_eq!(marquee.copies.len(), COPIES);
    let keys: Vec<_> = marquee.copies.iter().filter_map(RenderNode::key).collect();
    assert_eq!(keys, vec!["ticker-copy-0", "ticker-copy-1", "ticker-copy-2"]);
    for copy in &marquee.copies {
        assert_eq!(copy.text_content(), "SaleNow");
    }
    assert_eq!(node.text_content(), "SaleNowSaleNowSaleNow");
    assert_eq!(marquee.animation, "marquee-left 8s linear infinite");
    assert_eq!(marquee.keyframes.from, "translateX(0%)");
    assert_eq!(marquee.keyframes.to, "translateX(-50%)");
    assert!(marquee.pause_on_hover);
    assert!(!marquee.paused);
    assert!(marquee.classes.contains(&"marquee".to_string()));
}

#[test]
fn test_marquee_direction_and_pause() {
    let ticker = block(json!({
        "wrapper": "div#news",
        "animation": { "type": "marquee", "direction": "right", "duration": 12.5, "repeat": 2 },
        "blocks": [{ "wrapper": "span", "content": "x" }]
    }));
    let mut state = ViewState::new();
    state.set_paused("news", true);
    let node = render_with_state(&ticker, json!({}), &state).unwrap();
    let RenderNode::Marquee(marquee) = &node else {
        panic!("expected marquee");
    };
    assert_eq!(marquee.animation, "marquee-right 12.5s linear 2");
    assert_eq!(marquee.keyframes.from, "translateX(-50%)");
    assert!(marquee.paused);
    assert_eq!(marquee.style.get("animation-play-state"), Some(&json!("paused")));
    assert_eq!(MarqueeComponent::animation(&crate::parser::MarqueeSpec::default()), "marquee-left 8s linear infinite");
}

/// 悬停暂停发出 set_paused，写回 ViewState 后重新渲染即为暂停状态
#[test]
fn test_marquee_hover_pauses() {
    let (handlers, calls) = recorder();
    let ticker = block(json!({
        "type": "marquee",
        "id": "ticker",
        "events": { "click": { "action": "navigate", "target": "/sale" } },
        "blocks": [{ "wrapper": "span", "content": "Sale" }]
    }));
    let mut state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&ticker, &empty_scope(), &empty_scope(), &handlers)
        .unwrap()
        .unwrap();

    node.event(Trigger::Click).expect("declared click").invoke();
    node.event(Trigger::MouseEnter).expect("hover in").invoke();
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            HostCall::Navigate { url: "/sale".to_string() },
            HostCall::SetPaused { target: "ticker".to_string(), paused: true },
        ]
    );

    assert!(state.apply(&calls.lock().unwrap()[1]));
    let node = render_with_state(&ticker, json!({}), &state).unwrap();
    let RenderNode::Marquee(marquee) = &node else {
        panic!("expected marquee");
    };
    assert!(marquee.paused);

    node.event(Trigger::MouseLeave).expect("hover out").invoke();
    assert_eq!(
        calls.lock().unwrap().last(),
        Some(&HostCall::SetPaused { target: "ticker".to_string(), paused: false })
    );

    // 关闭悬停暂停时不挂 mouseenter
    let still = block(json!({
        "animation": { "type": "marquee", "pause_on_hover": false },
        "blocks": [{ "wrapper": "span", "content": "x" }]
    }));
    assert!(render(&still, json!({})).unwrap().event(Trigger::MouseEnter).is_none());
}

#[test]
fn test_swiper_config_parsing() {
    let config = SwiperConfig::from_raw(Some(&json!({
        "slides_per_view": 1.5,
        "space_between": 12,
        "loop": true,
        "effect": "fade",
        "autoplay": true,
        "pagination": true
    })));
    assert_eq!(config.layout, SlideLayout { slides_per_view: 1.5, space_between: 12.0 });
    assert!(config.loop_mode);
    assert_eq!(config.effect, SwiperEffect::Fade);
    assert!(config.cross_fade);
    assert_eq!(config.autoplay.map(|a| a.delay_ms), Some(3000));
    let pagination = config.pagination.expect("pagination");
    assert!(pagination.clickable);
    assert_eq!(pagination.kind, PaginationKind::Bullets);

    let custom = SwiperConfig::from_raw(Some(&json!({
        "effect": "cube",
        "autoplay": { "delay": 5000, "disable_on_interaction": true },
        "pagination": { "type": "fraction" }
    })));
    assert_eq!(custom.effect, SwiperEffect::Slide);
    assert_eq!(custom.autoplay.map(|a| (a.delay_ms, a.disable_on_interaction)), Some((5000, true)));
    assert_eq!(custom.pagination.map(|p| p.kind), Some(PaginationKind::Fraction));

    assert_eq!(SwiperConfig::from_raw(None), SwiperConfig::default());
}

#[test]
fn test_swiper_coverflow_and_centered() {
    let config = SwiperConfig::from_raw(Some(&json!({
        "effect": "coverflow",
        "centeredSlides": true,
        "coverflowEffect": { "rotate": 30, "slideShadows": true }
    })));
    assert_eq!(config.effect, SwiperEffect::Coverflow);
    assert!(config.centered_slides);
    assert_eq!(
        config.coverflow,
        Coverflow { rotate: 30.0, stretch: 0.0, depth: 100.0, modifier: 2.5, slide_shadows: true }
    );

    // 居中时每一张都能成为当前页
    let gallery = block(json!({
        "type": "swiper",
        "id": "gallery",
        "config": { "slides_per_view": 3, "centered_slides": true, "effect": "coverflow" },
        "blocks": [
            { "wrapper": "div", "content": "a" },
            { "wrapper": "div", "content": "b" },
            { "wrapper": "div", "content": "c" },
            { "wrapper": "div", "content": "d" }
        ]
    }));
    let mut state = ViewState::new();
    state.set_carousel_index("gallery", 3);
    let RenderNode::Carousel(carousel) = render_with_state(&gallery, json!({}), &state).unwrap() else {
        panic!("expected carousel");
    };
    assert_eq!(carousel.active, 3);
    assert!(carousel.centered_slides);
    assert_eq!(carousel.coverflow.map(|c| c.depth), Some(100.0));

    let plain = block(json!({ "type": "swiper", "id": "plain", "blocks": [{ "wrapper": "div" }] }));
    let RenderNode::Carousel(carousel) = render(&plain, json!({})).unwrap() else {
        panic!("expected carousel");
    };
    assert!(!carousel.centered_slides);
    assert!(carousel.coverflow.is_none());
}

/// 轮播自身声明的事件保留在节点上
#[test]
fn test_swiper_keeps_declared_events() {
    let (handlers, calls) = recorder();
    let hero = block(json!({
        "type": "swiper",
        "id": "hero",
        "events": { "on_click": { "action": "navigate", "target": "/collections" } },
        "blocks": [{ "wrapper": "div", "content": "a" }]
    }));
    let state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&hero, &empty_scope(), &empty_scope(), &handlers)
        .unwrap()
        .unwrap();
    node.event(Trigger::Click).expect("declared click").invoke();
    assert_eq!(*calls.lock().unwrap(), vec![HostCall::Navigate { url: "/collections".to_string() }]);
}

/// 进度 = (当前下标 + 1) / total_slides
#[test]
fn test_progress_bar_follows_carousel() {
    let bar = block(json!({
        "type": "progress_bar",
        "wrapper": "div#hero-progress.bar",
        "data": { "swiper_target": "hero", "total_slides": 4 },
        "style": { "height": "2px" }
    }));
    let mut state = ViewState::new();
    state.set_carousel_index("hero", 1);
    let node = render_with_state(&bar, json!({}), &state).unwrap();
    let el = element(&node);
    assert_eq!(el.tag, "div");
    assert_eq!(el.id.as_deref(), Some("hero-progress"));
    assert_eq!(el.classes, vec!["bar"]);
    assert_eq!(el.style.get("width"), Some(&json!("50%")));
    assert_eq!(el.style.get("height"), Some(&json!("2px")));
    assert_eq!(el.attrs.get("data-progress").map(String::as_str), Some("50"));
    assert_eq!(el.attrs.get("data-swiper-target").map(String::as_str), Some("hero"));

    // 缺省目标 swiper、总数 1，越界时封顶 100%
    let default_bar = block(json!({ "type": "progress_bar" }));
    let mut state = ViewState::new();
    state.set_carousel_index("swiper", 5);
    let node = render_with_state(&default_bar, json!({}), &state).unwrap();
    assert_eq!(element(&node).style.get("width"), Some(&json!("100%")));
    assert_eq!(element(&node).attrs.get("data-swiper-target").map(String::as_str), Some("swiper"));
}

/// 断点按 min-width 升序逐层叠加
#[test]
fn test_swiper_breakpoints_mobile_first() {
    let config = SwiperConfig::from_raw(Some(&json!({
        "slides_per_view": 1,
        "breakpoints": {
            "1024": { "slides_per_view": 4 },
            "640": { "slides_per_view": 2, "space_between": 16 },
            "tablet": { "slides_per_view": 9 }
        }
    })));
    assert_eq!(config.breakpoints.len(), 2);
    assert_eq!(config.layout_for(None).slides_per_view, 1.0);
    assert_eq!(config.layout_for(Some(320)).slides_per_view, 1.0);
    assert_eq!(config.layout_for(Some(640)), SlideLayout { slides_per_view: 2.0, space_between: 16.0 });
    assert_eq!(config.layout_for(Some(1280)), SlideLayout { slides_per_view: 4.0, space_between: 16.0 });
}

#[test]
fn test_slide_nav_loop_wrap() {
    let single = SlideLayout { slides_per_view: 1.0, space_between: 0.0 };
    let last = SlideNav::new(3, &single, true, 2);
    assert_eq!(last.next(), 0);
    let first = SlideNav::new(3, &single, true, 0);
    assert_eq!(first.prev(), 2);
    assert_eq!(first.clamp(7), 1);
}

#[test]
fn test_slide_nav_clamped() {
    let double = SlideLayout { slides_per_view: 1.5, space_between: 0.0 };
    let nav = SlideNav::new(5, &double, false, 10);
    assert_eq!(nav.visible, 2);
    assert_eq!(nav.max_index(), 3);
    assert_eq!(nav.active, 3);
    assert_eq!(nav.next(), 3);
    assert_eq!(nav.prev(), 2);
    assert_eq!(SlideNav::new(0, &double, false, 4).next(), 0);
}

#[test]
fn test_swiper_render_with_controls() {
    let (handlers, calls) = recorder();
    let hero = block(json!({
        "type": "swiper",
        "id": "hero",
        "config": { "loop": true, "navigation": true, "pagination": true },
        "blocks": [{
            "type": "repeater",
            "source": "slides",
            "template": { "wrapper": "div.slide", "bind_content": "item.title" }
        }]
    }));
    let mut state = ViewState::new();
    state.set_carousel_index("hero", 2);

    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&hero, &scope(json!({ "slides": [{ "title": "a" }, { "title": "b" }, { "title": "c" }] })), &empty_scope(), &handlers)
        .unwrap()
        .unwrap();
    let RenderNode::Carousel(carousel) = &node else {
        panic!("expected carousel, got {:?}", node);
    };

    assert_eq!(carousel.id, "hero");
    assert_eq!(carousel.slides.len(), 3);
    assert_eq!(carousel.active, 2);
    assert!(carousel.classes.contains(&"swiper".to_string()));

    let navigation = carousel.navigation.as_ref().expect("navigation");
    navigation.next.invoke();
    navigation.prev.invoke();
    let bullets = &carousel.pagination.as_ref().expect("pagination").bullets;
    assert_eq!(bullets.len(), 3);
    bullets[1].invoke();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            HostCall::SliderGoto { target: "hero".to_string(), index: 0 },
            HostCall::SliderGoto { target: "hero".to_string(), index: 1 },
            HostCall::SliderGoto { target: "hero".to_string(), index: 1 },
        ]
    );
}

/// 轮播内部的 slider_* 事件改写为针对本轮播，指向其它轮播的原样转发
#[test]
fn test_swiper_scopes_slider_events() {
    let (handlers, calls) = recorder();
    let promo = block(json!({
        "type": "swiper",
        "wrapper": "div#promo",
        "blocks": [
            { "wrapper": "div", "blocks": [{ "wrapper": "button#next", "events": { "click": { "action": "slider_next" } } }] },
            { "wrapper": "div", "blocks": [{ "wrapper": "button#other", "events": { "click": { "action": "slider_next", "target": "other" } } }] }
        ]
    }));
    let state = ViewState::new();
    let node = BlockRenderer::new(RenderOptions::default(), &state)
        .render(&promo, &empty_scope(), &empty_scope(), &handlers)
        .unwrap()
        .unwrap();

    node.find_element_by_id("next").unwrap().event(Trigger::Click).unwrap().invoke();
    node.find_element_by_id("other").unwrap().event(Trigger::Click).unwrap().invoke();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            HostCall::SliderGoto { target: "promo".to_string(), index: 1 },
            HostCall::SliderNext { target: "other".to_string() },
        ]
    );
}

#[test]
fn test_icon_rendering() {
    let cart = block(json!({ "type": "icon", "icon": "cart", "size": 20, "class": "nav-icon" }));
    let node = render(&cart, json!({})).unwrap();
    let RenderNode::Icon(icon) = &node else {
        panic!("expected icon, got {:?}", node);
    };
    assert_eq!(icon.name, "shopping-cart");
    assert_eq!(icon.size, Some(20.0));
    assert_eq!(icon.classes, vec!["nav-icon"]);

    let bound = block(json!({ "wrapper": "svg", "bind_icon": "theme_icon", "icon": "sun" }));
    let RenderNode::Icon(icon) = render(&bound, json!({ "theme_icon": "dark-mode" })).unwrap() else {
        panic!("expected icon");
    };
    assert_eq!(icon.name, "moon");

    let RenderNode::Icon(fallback) = render(&block(json!({ "type": "icon" })), json!({})).unwrap() else {
        panic!("expected icon");
    };
    assert_eq!(fallback.name, canonical_name(FALLBACK_ICON));
}

#[test]
fn test_icon_aliases() {
    assert_eq!(canonical_name("close"), "x");
    assert_eq!(canonical_name("X"), "x");
    assert_eq!(canonical_name("Shopping-Cart"), "shopping-cart");
    assert_eq!(canonical_name("sparkles"), "sparkles");
    assert!(element(&render(&block(json!({ "wrapper": "svg" })), json!({})).unwrap()).tag == "svg");
}

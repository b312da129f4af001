//! 页面组合 - 按顺序渲染启用的分区

use crate::config::RenderOptions;
use crate::error::RenderResult;
use crate::event::Handlers;
use crate::parser::{merge_scope, DataMap, PageData, PageSection, Scope};
use crate::renderer::node::ElementNode;
use crate::renderer::{BlockRenderer, RenderNode, ViewState};
use std::sync::Arc;

/// 页面组合器
pub struct PageComposer<'s> {
    renderer: BlockRenderer<'s>,
}

impl<'s> PageComposer<'s> {
    pub fn new(options: RenderOptions, state: &'s ViewState) -> Self {
        Self { renderer: BlockRenderer::new(options, state) }
    }

    /// `enabled == false` 的分区被移除，其余保持原顺序
    pub fn enabled_sections(page: &PageData) -> impl Iterator<Item = &PageSection> {
        page.sections.iter().filter(|section| section.is_enabled())
    }

    /// `{...global, ...settings, ...第一个区块的 data}`，后者优先
    pub fn section_scope(global: &Scope, section: &PageSection) -> Scope {
        let with_settings = merge_scope(global, Some(&section.settings));
        let first_data = section.blocks.first().and_then(|block| block.data.as_ref());
        merge_scope(&with_settings, first_data)
    }

    /// 渲染整页：`div.page.page-<template>`
    pub fn render(&self, page: &PageData, global: &Scope, handlers: &Handlers) -> RenderResult<RenderNode> {
        let mut root = ElementNode::new("page", "div");
        root.classes.push("page".to_string());
        if !page.template.is_empty() {
            root.classes.push(format!("page-{}", page.template));
        }

        for section in Self::enabled_sections(page) {
            if let Some(node) = self.render_section(section, global, handlers)? {
                root.children.push(node);
            }
        }

        tracing::debug!(template = %page.template, sections = root.children.len(), "page composed");
        Ok(RenderNode::Element(root))
    }

    /// 单独渲染一个分区（局部刷新时使用）；禁用或没有区块时返回 None
    pub fn render_section(
        &self,
        section: &PageSection,
        global: &Scope,
        handlers: &Handlers,
    ) -> RenderResult<Option<RenderNode>> {
        if !section.is_enabled() || section.blocks.is_empty() {
            return Ok(None);
        }

        let _span = tracing::debug_span!("section", id = %section.id, kind = %section.section_type).entered();
        let scope = Self::section_scope(global, section);
        let context: Scope = Arc::new(DataMap::new());

        let mut element = ElementNode::new(section.id.clone(), "section");
        element.id = Some(section.id.clone());
        element.attrs.insert("data-section-type".to_string(), section.section_type.clone());
        element.children = self.renderer.render_blocks(&section.blocks, &scope, &context, handlers)?;

        Ok(Some(RenderNode::Element(element)))
    }
}

//! 页面与主题 schema

use super::block::Block;
use super::DataMap;
use serde::Deserialize;
use std::collections::BTreeMap;

/// 页面中可独立开关的分区
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSection {
    pub id: String,
    #[serde(rename = "type", default)]
    pub section_type: String,
    /// 只有显式 `false` 才会移除，缺省或 null 都保留
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub settings: DataMap,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl PageSection {
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// 页面数据，sections 顺序即渲染顺序
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub sections: Vec<PageSection>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub og: BTreeMap<String, String>,
    #[serde(default)]
    pub twitter: BTreeMap<String, String>,
}

/// 全局分区（公告栏 / 页头 / 页脚），形状与 PageSection 相同
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalSection {
    /// 全局区域需要显式开启
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(rename = "type", default)]
    pub section_type: String,
    #[serde(default)]
    pub settings: DataMap,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl GlobalSection {
    /// 启用且有内容时才渲染
    pub fn is_renderable(&self) -> bool {
        self.enabled == Some(true) && !self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GlobalSections {
    #[serde(default)]
    pub announcement: Option<GlobalSection>,
    #[serde(default)]
    pub header: Option<GlobalSection>,
    #[serde(default)]
    pub footer: Option<GlobalSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub colors: DataMap,
    #[serde(default)]
    pub fonts: DataMap,
    #[serde(default)]
    pub border_radius: DataMap,
    #[serde(default)]
    pub component_styles: DataMap,
}

/// theme.json
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThemeData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub global_settings: GlobalSettings,
    #[serde(default)]
    pub global_sections: GlobalSections,
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

/// 内容服务的响应外壳 `{ success, data }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

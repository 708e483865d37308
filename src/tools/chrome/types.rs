use serde::{Deserialize, Serialize};

use crate::tools::page::{collapse_whitespace, PageInspector, ScrollMetrics};

/// 浏览器中一次性采集到的页面信号
///
/// Deserialized from the JSON object returned by the snapshot script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub h1_text: Option<String>,
    pub has_meta_description: bool,
    pub image_alts: Vec<Option<String>>,
    pub cta_count: usize,
    pub scroll: ScrollMetrics,
}

impl PageInspector for PageSnapshot {
    fn primary_heading_text(&self) -> Option<String> {
        // innerText 已经是渲染后的文本，这里只做空白折叠
        self.h1_text.as_deref().map(collapse_whitespace)
    }

    fn has_meta_description(&self) -> bool {
        self.has_meta_description
    }

    fn image_alts(&self) -> Vec<Option<String>> {
        self.image_alts.clone()
    }

    fn call_to_action_count(&self) -> usize {
        self.cta_count
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll
    }
}

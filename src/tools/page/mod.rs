pub mod html_page;

pub use html_page::HtmlPage;

use serde::{Deserialize, Serialize};

/// 页面滚动信号，单位为 CSS 像素
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self { scroll_y, scroll_height, viewport_height }
    }

    /// Distance the page can actually scroll. Zero or negative means the page fits the viewport.
    pub fn scrollable_distance(&self) -> f64 {
        self.scroll_height - self.viewport_height
    }
}

/// Read-only view of a rendered page used by the analyzer.
///
/// Implementations must tolerate absent elements: a missing heading is `None`,
/// a page without images returns an empty list.
pub trait PageInspector {
    /// Visible text of the first `h1`, if the page has one.
    fn primary_heading_text(&self) -> Option<String>;

    /// Whether a `meta[name="description"]` element exists.
    fn has_meta_description(&self) -> bool;

    /// The `alt` attribute of every `img`, in document order.
    fn image_alts(&self) -> Vec<Option<String>>;

    /// Number of elements matching `button, a[class*="btn"], a[class*="button"]`.
    fn call_to_action_count(&self) -> usize;

    fn scroll_metrics(&self) -> ScrollMetrics;
}

/// 与浏览器 innerText 近似：折叠空白并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

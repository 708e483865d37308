use std::path::Path;

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::debug;

use crate::tools::page::{collapse_whitespace, PageInspector, ScrollMetrics};
use crate::types::error::{AppError, AppResult};

lazy_static! {
    static ref H1_SELECTOR: Selector = Selector::parse("h1").unwrap();
    static ref META_DESCRIPTION_SELECTOR: Selector =
        Selector::parse(r#"meta[name="description"]"#).unwrap();
    static ref IMG_SELECTOR: Selector = Selector::parse("img").unwrap();
    static ref CTA_SELECTOR: Selector =
        Selector::parse(r#"button, a[class*="btn"], a[class*="button"]"#).unwrap();
}

/// 静态 HTML 文档，没有布局信息，滚动信号需要调用方提供
pub struct HtmlPage {
    document: Html,
    scroll: ScrollMetrics,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            scroll: ScrollMetrics::default(),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Html(format!("failed to read {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = html.len(), "loaded html document");
        Ok(Self::parse(&html))
    }

    pub fn with_scroll_metrics(mut self, scroll: ScrollMetrics) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn title(&self) -> Option<String> {
        lazy_static! {
            static ref TITLE_SELECTOR: Selector = Selector::parse("title").unwrap();
        }
        self.document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
    }
}

impl PageInspector for HtmlPage {
    fn primary_heading_text(&self) -> Option<String> {
        self.document
            .select(&H1_SELECTOR)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
    }

    fn has_meta_description(&self) -> bool {
        self.document.select(&META_DESCRIPTION_SELECTOR).next().is_some()
    }

    fn image_alts(&self) -> Vec<Option<String>> {
        self.document
            .select(&IMG_SELECTOR)
            .map(|img| img.value().attr("alt").map(str::to_string))
            .collect()
    }

    fn call_to_action_count(&self) -> usize {
        self.document.select(&CTA_SELECTOR).count()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll
    }
}

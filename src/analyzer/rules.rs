use serde::{Deserialize, Serialize};

use crate::tools::page::PageInspector;

pub const MISSING_H1_PENALTY: u32 = 20;
pub const SHORT_H1_PENALTY: u32 = 10;
pub const MISSING_META_PENALTY: u32 = 20;
pub const MISSING_ALT_PENALTY: u32 = 5;
pub const MISSING_CTA_PENALTY: u32 = 15;

/// H1 文本少于这个长度视为太短，按 UTF-16 码元计数，与 innerText.length 一致
pub const MIN_HEADING_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub penalty: u32,
    pub issue: String,
}

impl Finding {
    fn new(penalty: u32, issue: impl Into<String>) -> Self {
        Self { penalty, issue: issue.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Covers both "missing" and "too short"; the short check only runs when a heading exists.
    PrimaryHeading,
    MetaDescription,
    ImageAltText,
    CallToAction,
}

/// Evaluation order, which is also the order of the reported issues.
pub const RULES: [Rule; 4] = [
    Rule::PrimaryHeading,
    Rule::MetaDescription,
    Rule::ImageAltText,
    Rule::CallToAction,
];

impl Rule {
    pub fn evaluate(&self, page: &dyn PageInspector) -> Option<Finding> {
        match self {
            Rule::PrimaryHeading => match page.primary_heading_text() {
                None => Some(Finding::new(MISSING_H1_PENALTY, "Missing H1 heading")),
                Some(text) if text.encode_utf16().count() < MIN_HEADING_CHARS => {
                    Some(Finding::new(SHORT_H1_PENALTY, "H1 heading is too short"))
                }
                Some(_) => None,
            },
            Rule::MetaDescription => (!page.has_meta_description())
                .then(|| Finding::new(MISSING_META_PENALTY, "Missing meta description")),
            Rule::ImageAltText => {
                let missing = page
                    .image_alts()
                    .iter()
                    .filter(|alt| alt.as_deref().map_or(true, str::is_empty))
                    .count();
                (missing > 0).then(|| {
                    Finding::new(
                        MISSING_ALT_PENALTY.saturating_mul(u32::try_from(missing).unwrap_or(u32::MAX)),
                        format!("{} images missing alt text", missing),
                    )
                })
            }
            Rule::CallToAction => (page.call_to_action_count() == 0).then(|| {
                Finding::new(MISSING_CTA_PENALTY, "No call-to-action (CTA) buttons found")
            }),
        }
    }
}

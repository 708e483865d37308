pub mod rules;

pub use rules::{Finding, Rule, RULES};

use tracing::{debug, info};

use crate::tools::page::PageInspector;
use crate::types::health::PageHealth;

/// 按固定顺序执行全部规则并汇总得分，只读，不修改页面
pub fn analyze_page(page: &dyn PageInspector) -> PageHealth {
    let mut total_penalty = 0u32;
    let mut issues = Vec::new();

    for rule in RULES {
        if let Some(finding) = rule.evaluate(page) {
            debug!(rule = ?rule, penalty = finding.penalty, "rule failed");
            total_penalty = total_penalty.saturating_add(finding.penalty);
            issues.push(finding.issue);
        }
    }

    let health = PageHealth::from_penalties(total_penalty, issues);
    info!(score = health.score, issues = health.issues.len(), "page analyzed");
    health
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::tools::page::{PageInspector, ScrollMetrics};

    /// 测试用的页面，直接给出各项信号
    #[derive(Debug, Clone, Default)]
    pub struct FakePage {
        pub heading: Option<String>,
        pub meta_description: bool,
        pub alts: Vec<Option<String>>,
        pub ctas: usize,
        pub scroll: ScrollMetrics,
    }

    impl FakePage {
        pub fn perfect() -> Self {
            Self {
                heading: Some("Turning potential into precision".into()),
                meta_description: true,
                alts: vec![Some("Team photo".into()), Some("Logo".into())],
                ctas: 1,
                scroll: ScrollMetrics::default(),
            }
        }
    }

    impl PageInspector for FakePage {
        fn primary_heading_text(&self) -> Option<String> {
            self.heading.clone()
        }

        fn has_meta_description(&self) -> bool {
            self.meta_description
        }

        fn image_alts(&self) -> Vec<Option<String>> {
            self.alts.clone()
        }

        fn call_to_action_count(&self) -> usize {
            self.ctas
        }

        fn scroll_metrics(&self) -> ScrollMetrics {
            self.scroll
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakePage;
    use super::*;
    use crate::tools::page::HtmlPage;

    #[test]
    fn empty_document_fails_independent_rules() {
        let health = analyze_page(&FakePage::default());
        assert_eq!(health.score, 45);
        assert_eq!(
            health.issues,
            vec![
                "Missing H1 heading".to_string(),
                "Missing meta description".to_string(),
                "No call-to-action (CTA) buttons found".to_string(),
            ]
        );
    }

    #[test]
    fn empty_html_matches_fake_empty_page() {
        let from_html = analyze_page(&HtmlPage::parse(""));
        assert_eq!(from_html, analyze_page(&FakePage::default()));
    }

    #[test]
    fn perfect_page_scores_full() {
        let health = analyze_page(&FakePage::perfect());
        assert_eq!(health.score, 100);
        assert!(health.issues.is_empty());
    }

    #[test]
    fn missing_heading_caps_score_at_80() {
        let page = FakePage { heading: None, ..FakePage::perfect() };
        let health = analyze_page(&page);
        assert!(health.score <= 80);
        assert!(health.issues.contains(&"Missing H1 heading".to_string()));
        assert!(!health.issues.contains(&"H1 heading is too short".to_string()));
    }

    #[test]
    fn short_heading_costs_ten() {
        let page = FakePage { heading: Some("Welcome".into()), ..FakePage::perfect() };
        let health = analyze_page(&page);
        assert_eq!(health.score, 90);
        assert_eq!(health.issues, vec!["H1 heading is too short".to_string()]);

        // 恰好 10 个字符不算太短
        let page = FakePage { heading: Some("0123456789".into()), ..FakePage::perfect() };
        assert_eq!(analyze_page(&page).score, 100);
    }

    #[test]
    fn missing_alts_deduct_five_each() {
        for k in 1..=4usize {
            let mut page = FakePage::perfect();
            page.alts.extend((0..k).map(|i| if i % 2 == 0 { None } else { Some(String::new()) }));
            let health = analyze_page(&page);
            assert_eq!(health.score, 100 - 5 * k as u32);
            assert_eq!(health.issues, vec![format!("{} images missing alt text", k)]);
        }
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let page = FakePage {
            alts: vec![None; 30],
            ..FakePage::default()
        };
        let health = analyze_page(&page);
        assert_eq!(health.score, 0);
        assert_eq!(health.issues.len(), 4);
        assert_eq!(health.issues[2], "30 images missing alt text");
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let page = HtmlPage::parse(
            r#"<h1>Short</h1><img src="a.png"><a class="btn" href="/">Go</a>"#,
        );
        let first = analyze_page(&page);
        assert_eq!(first, analyze_page(&page));
        assert_eq!(first.score, 100 - 10 - 20 - 5);
        assert_eq!(
            first.issues,
            vec![
                "H1 heading is too short".to_string(),
                "Missing meta description".to_string(),
                "1 images missing alt text".to_string(),
            ]
        );
    }
}

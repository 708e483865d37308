use colored::*;

use crate::types::health::{HealthGrade, PageHealth, MAX_SCORE};
use crate::types::message::ChatMessage;

const BAR_WIDTH: u32 = 20;

pub fn score_bar(score: u32) -> String {
    let filled = (score.min(MAX_SCORE) * BAR_WIDTH + MAX_SCORE / 2) / MAX_SCORE;
    format!("[{}{}]", "#".repeat(filled as usize), "-".repeat((BAR_WIDTH - filled) as usize))
}

/// 页面检查结果，颜色分档与网页浮层一致：>=90 绿，>=70 黄，其余红
pub fn render_health(label: &str, health: &PageHealth) -> String {
    let bar = score_bar(health.score);
    let bar = match health.grade() {
        HealthGrade::Good => bar.green(),
        HealthGrade::Fair => bar.yellow(),
        HealthGrade::Poor => bar.red(),
    };

    let mut lines = vec![
        format!("{} {}", "Page Audit".bright_cyan().bold(), label.dimmed()),
        format!("Health Score {} {}/{}", bar, health.score, MAX_SCORE),
    ];

    if health.is_clean() {
        lines.push("No issues found on this page!".bright_green().to_string());
    } else {
        lines.push("Improvements".bright_yellow().bold().to_string());
        for issue in &health.issues {
            lines.push(format!("  {} {}", "•".red(), issue));
        }
    }

    lines.join("\n")
}

pub fn render_depth(depth: u32) -> String {
    format!("{} {}%", "Scroll Depth".bright_cyan(), depth.to_string().bold())
}

pub fn render_reply(message: &ChatMessage) -> String {
    let mut out = message.text.bright_white().to_string();
    if let Some(sources) = &message.sources {
        for source in sources {
            out.push_str(&format!("\n  {} {} {}", "↗".blue(), source.title, source.uri.dimmed()));
        }
    }
    out
}

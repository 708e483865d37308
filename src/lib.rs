pub mod agents;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod llm;
pub mod tools;
pub mod tracker;
pub mod types;

pub use analyzer::analyze_page;
pub use tools::page::{PageInspector, ScrollMetrics};
pub use tracker::{track_scroll_depth, ScrollDepthGuard};
pub use types::{AppError, AppResult, PageHealth};

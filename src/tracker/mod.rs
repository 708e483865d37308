pub mod scroll_depth;

pub use scroll_depth::{scroll_percentage, track_scroll_depth, ScrollDepthGuard};

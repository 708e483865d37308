use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::tools::base::{ListenerId, ScrollEvents};
use crate::tools::page::ScrollMetrics;

/// Rounded scroll percentage, or `None` when the page cannot scroll.
///
/// Halves round up, so 12.5% reports as 13.
pub fn scroll_percentage(metrics: &ScrollMetrics) -> Option<f64> {
    let total = metrics.scrollable_distance();
    if total <= 0.0 {
        return None;
    }
    Some((metrics.scroll_y / total * 100.0 + 0.5).floor())
}

/// 一次注册对应的句柄；调用 `cancel` 之后不会再有回调
///
/// Dropping the guard leaves the registration in place, cancellation is explicit.
pub struct ScrollDepthGuard {
    events: ScrollEvents,
    id: ListenerId,
    max_depth: Arc<AtomicU32>,
}

impl ScrollDepthGuard {
    pub fn cancel(&self) {
        if self.events.unsubscribe(self.id) {
            debug!(listener = %self.id, "scroll depth tracking cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.events.is_subscribed(self.id)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth.load(Ordering::SeqCst)
    }
}

/// Registers a scroll observer that reports each new maximum depth.
///
/// The callback only fires when the rounded percentage strictly exceeds every
/// value seen so far by this registration, and receives that new maximum.
pub fn track_scroll_depth<F>(events: &ScrollEvents, mut callback: F) -> ScrollDepthGuard
where
    F: FnMut(u32) + Send + 'static,
{
    let max_depth = Arc::new(AtomicU32::new(0));
    let shared = Arc::clone(&max_depth);

    let id = events.subscribe(move |metrics| {
        let Some(percentage) = scroll_percentage(metrics) else {
            return;
        };
        let current = shared.load(Ordering::SeqCst);
        if percentage > current as f64 {
            let depth = percentage as u32;
            shared.store(depth, Ordering::SeqCst);
            debug!(depth, "new max scroll depth");
            callback(depth);
        }
    });

    ScrollDepthGuard {
        events: events.clone(),
        id,
        max_depth,
    }
}

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use crate::tools::page::ScrollMetrics;

pub type ListenerId = Uuid;

type Listener = Arc<Mutex<Box<dyn FnMut(&ScrollMetrics) + Send>>>;

/// 滚动事件的订阅中心，相当于页面上的 scroll 事件源
///
/// Listeners run one at a time, in registration order. The listener table is not
/// locked while a listener runs, so a listener may unsubscribe itself or others.
#[derive(Clone, Default)]
pub struct ScrollEvents {
    listeners: Arc<Mutex<Vec<(ListenerId, Listener)>>>,
}

impl ScrollEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&ScrollMetrics) + Send + 'static,
    {
        let id = Uuid::new_v4();
        let listener: Box<dyn FnMut(&ScrollMetrics) + Send> = Box::new(listener);
        self.table().push((id, Arc::new(Mutex::new(listener))));
        debug!(listener = %id, "scroll listener added");
        id
    }

    /// Returns false when the listener was already removed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut table = self.table();
        let before = table.len();
        table.retain(|(listener_id, _)| *listener_id != id);
        let removed = table.len() != before;
        if removed {
            debug!(listener = %id, "scroll listener removed");
        }
        removed
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.table().iter().any(|(listener_id, _)| *listener_id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.table().len()
    }

    pub fn notify(&self, metrics: ScrollMetrics) {
        // 先拷贝一份快照，回调期间不持有表锁
        let snapshot: Vec<(ListenerId, Listener)> = self
            .table()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            // 本轮通知中已被移除的监听器不再调用
            if !self.is_subscribed(id) {
                continue;
            }
            let mut callback = listener.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (*callback)(&metrics);
        }
    }
}

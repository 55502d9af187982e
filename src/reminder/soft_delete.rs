use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Pending,
    Restored,
}

pub struct PendingDeletes {
    grace: Duration,
    timers: HashMap<String, JoinHandle<()>>,
    tx: UnboundedSender<String>,
    rx: UnboundedReceiver<String>,
}

impl PendingDeletes {
    pub fn new(grace: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            grace,
            timers: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.timers.contains_key(id)
    }

    /// Schedule deletion of `id`, or undo it when it is already pending.
    /// Must be called from within a tokio runtime.
    pub fn toggle(&mut self, id: &str) -> Toggle {
        if let Some(timer) = self.timers.remove(id) {
            timer.abort();
            debug!(id, "delete undone");
            return Toggle::Restored;
        }

        let tx = self.tx.clone();
        let grace = self.grace;
        let owned = id.to_string();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = tx.send(owned);
        });
        self.timers.insert(id.to_string(), timer);
        debug!(id, grace_secs = grace.as_secs(), "delete pending");
        Toggle::Pending
    }

    /// Ids whose grace period ran out. Ids undone after their timer fired
    /// but before this call are skipped.
    pub fn drain_expired(&mut self) -> Vec<String> {
        let mut expired = Vec::new();
        while let Ok(id) = self.rx.try_recv() {
            if self.timers.remove(&id).is_some() {
                expired.push(id);
            }
        }
        expired
    }

    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
        while self.rx.try_recv().is_ok() {}
    }
}

impl Drop for PendingDeletes {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::reminder::sample;
    use crate::reminder::store::{MemoryStorage, ReminderStore};

    async fn settle() {
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn expired_delete_removes_reminder() {
        let mut store = ReminderStore::new(MemoryStorage::default());
        store.add(sample("42", "2025-06-03T09:00:00Z", "")).unwrap();
        let mut pending = PendingDeletes::new(DEFAULT_GRACE);

        assert_eq!(pending.toggle("42"), Toggle::Pending);
        assert!(pending.is_pending("42"));

        tokio::time::sleep(Duration::from_secs(9)).await;
        settle().await;
        assert!(pending.drain_expired().is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;
        for id in pending.drain_expired() {
            store.remove(&id).unwrap();
        }
        assert!(store.find("42").is_none());
        assert!(!pending.is_pending("42"));
    }

    #[tokio::test(start_paused = true)]
    async fn undo_before_grace_keeps_reminder() {
        let mut store = ReminderStore::new(MemoryStorage::default());
        store.add(sample("42", "2025-06-03T09:00:00Z", "")).unwrap();
        let mut pending = PendingDeletes::new(DEFAULT_GRACE);

        pending.toggle("42");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(pending.toggle("42"), Toggle::Restored);

        tokio::time::sleep(Duration::from_secs(30)).await;
        settle().await;
        assert!(pending.drain_expired().is_empty());
        assert!(store.find("42").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn timers_are_independent_per_id() {
        let mut pending = PendingDeletes::new(Duration::from_secs(10));
        pending.toggle("a");
        tokio::time::sleep(Duration::from_secs(4)).await;
        pending.toggle("b");

        tokio::time::sleep(Duration::from_secs(6)).await;
        settle().await;
        assert_eq!(pending.drain_expired(), vec!["a".to_string()]);
        assert!(pending.is_pending("b"));

        tokio::time::sleep(Duration::from_secs(4)).await;
        settle().await;
        assert_eq!(pending.drain_expired(), vec!["b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn undo_after_timer_fired_but_before_drain_wins() {
        let mut pending = PendingDeletes::new(Duration::from_secs(1));
        pending.toggle("a");
        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(pending.toggle("a"), Toggle::Restored);
        assert!(pending.drain_expired().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_drops_everything() {
        let mut pending = PendingDeletes::new(Duration::from_secs(1));
        pending.toggle("a");
        pending.toggle("b");
        pending.cancel_all();
        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;
        assert!(pending.drain_expired().is_empty());
        assert!(!pending.is_pending("a"));
    }
}

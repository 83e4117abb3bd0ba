use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: String,
}

/// Operator alert sink. Called synchronously from the write paths.
pub trait Notifier: Send + Sync {
    fn alert(&self, level: NoticeLevel, message: &str);
}

/// Keeps the most recent notices for polling and fans each one out to live
/// subscribers.
pub struct BroadcastNotifier {
    recent: Mutex<VecDeque<Notice>>,
    capacity: usize,
    next_id: AtomicU64,
    tx: broadcast::Sender<Notice>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            next_id: AtomicU64::new(1),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn recent(&self) -> Vec<Notice> {
        self.since(0)
    }

    pub fn since(&self, last_id: u64) -> Vec<Notice> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.id > last_id)
            .cloned()
            .collect()
    }
}

impl Notifier for BroadcastNotifier {
    fn alert(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => tracing::info!(text = message, "operator notice"),
            NoticeLevel::Error => tracing::error!(text = message, "operator alert"),
        }

        let notice = Notice {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            level,
            message: message.to_string(),
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        {
            let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
            if recent.len() == self.capacity {
                recent.pop_front();
            }
            recent.push_back(notice.clone());
        }

        // No subscribers is fine
        let _ = self.tx.send(notice);
    }
}

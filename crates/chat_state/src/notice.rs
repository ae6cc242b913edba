//! User-facing notices
//!
//! Toast-style messages the front end shows outside the timelines. Emission
//! never blocks: when the channel is full the notice is dropped and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A submit was refused because the daily quota is used up.
    QuotaExceeded { used_today: u64, daily_limit: u64 },
    /// Usage entered the warning band.
    QuotaNearLimit { percentage: u32, remaining: u64 },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                used_today,
                daily_limit,
            } => write!(
                f,
                "Daily quota exceeded ({}/{} tokens). Please try again tomorrow.",
                used_today, daily_limit
            ),
            Self::QuotaNearLimit {
                percentage,
                remaining,
            } => write!(
                f,
                "You've used {}% of your daily quota ({} tokens remaining).",
                percentage, remaining
            ),
        }
    }
}

pub struct NoticeBus {
    tx: mpsc::Sender<Notice>,
    dropped: Arc<AtomicU64>,
}

impl NoticeBus {
    /// Returns the bus and the receiver the front end drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    pub fn emit(&self, notice: Notice) {
        if self.tx.try_send(notice).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Clone for NoticeBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

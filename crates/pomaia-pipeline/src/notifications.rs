//! Transient notifications and pipeline progress events
//!
//! Front ends subscribe to a broadcast of [`PipelineEvent`]s; short user-facing
//! messages are additionally kept for a TTL so they can be listed on demand.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

pub type NotificationId = u64;

/// How long a notification stays listed
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(6);

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Highlights,
    Summary,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Highlights => write!(f, "highlights"),
            Stage::Summary => write!(f, "summary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StageStarted {
        stage: Stage,
        /// Oracle calls the stage is about to issue
        calls: usize,
    },
    /// One highlight chunk's reply was merged into the results
    ChunkMerged {
        quotes: usize,
        tokens_used: u64,
        completed: usize,
        total: usize,
    },
    StageCompleted {
        stage: Stage,
        tokens_used: u64,
    },
    StageFailed {
        stage: Stage,
        error: String,
    },
    Notification(Notification),
}

/// Notification ids and the event channel, scoped to one pipeline instance
pub struct NotificationCenter {
    next_id: AtomicU64,
    ttl: Duration,
    active: Mutex<Vec<Notification>>,
    events: broadcast::Sender<PipelineEvent>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_NOTIFICATION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            next_id: AtomicU64::new(1),
            ttl,
            active: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Publish an event; having no subscribers is fine
    pub fn publish(&self, event: PipelineEvent) {
        let _ = self.events.send(event);
    }

    /// Show a message for the configured TTL
    pub fn notify(&self, text: impl Into<String>) -> NotificationId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            text: text.into(),
            created_at: Utc::now(),
            expires_at: Instant::now() + self.ttl,
        };
        debug!(id, text = %notification.text, "Notification posted");

        {
            let mut active = self.active.lock();
            active.retain(|n| !n.is_expired());
            active.push(notification.clone());
        }

        self.publish(PipelineEvent::Notification(notification));
        id
    }

    /// Notifications that have not expired yet, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let mut active = self.active.lock();
        active.retain(|n| !n.is_expired());
        active.clone()
    }

    /// Drop a notification before its TTL runs out
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }
}

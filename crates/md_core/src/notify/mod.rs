//! Notification dispatch.
//!
//! One-way, fire-and-forget. The engine calls the sink after a state
//! transition commits; a sink failure is logged and swallowed, never rolled
//! back into the triggering operation.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::models::{Notification, NotificationKind, NotificationPayload};
use crate::store::MatchStore;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// One-way dispatch of a typed event to a user.
pub trait NotificationSink: Send + Sync {
    fn create_notification(
        &self,
        user_id: &str,
        kind: NotificationKind,
        payload: NotificationPayload,
    ) -> Result<(), NotifyError>;
}

/// Sink that persists notifications as in-app rows through the store.
pub struct StoreSink {
    store: Arc<dyn MatchStore>,
}

impl StoreSink {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }
}

impl NotificationSink for StoreSink {
    fn create_notification(
        &self,
        user_id: &str,
        kind: NotificationKind,
        payload: NotificationPayload,
    ) -> Result<(), NotifyError> {
        self.store
            .insert_notification(Notification::new(user_id, kind, payload))
            .map(|_| ())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

/// A notification as observed by the recording sink.
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
}

/// Test sink that records every dispatch in memory.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("sink lock poisoned").clone()
    }

    pub fn sent_to(&self, user_id: &str) -> Vec<SentNotification> {
        self.sent().into_iter().filter(|n| n.user_id == user_id).collect()
    }

    pub fn count_of_kind(&self, kind: NotificationKind) -> usize {
        self.sent().iter().filter(|n| n.kind == kind).count()
    }
}

impl NotificationSink for RecordingSink {
    fn create_notification(
        &self,
        user_id: &str,
        kind: NotificationKind,
        payload: NotificationPayload,
    ) -> Result<(), NotifyError> {
        self.sent.lock().expect("sink lock poisoned").push(SentNotification {
            user_id: user_id.to_string(),
            kind,
            payload,
        });
        Ok(())
    }
}

/// Sink that always fails; used to prove dispatch failures never fail the
/// triggering operation.
#[cfg(test)]
pub struct FailingSink;

#[cfg(test)]
impl NotificationSink for FailingSink {
    fn create_notification(
        &self,
        _user_id: &str,
        _kind: NotificationKind,
        _payload: NotificationPayload,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("sink offline".to_string()))
    }
}

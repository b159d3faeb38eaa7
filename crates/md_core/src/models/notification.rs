//! Notification records and the typed event kinds the engine emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed notification events dispatched to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    JoinRequest,
    JoinApproved,
    JoinDeclined,
    PlayRequest,
    PlayRequestAccepted,
    PlayRequestDeclined,
    ScoreRequest,
    ScoreConfirmed,
    ScoreNull,
    MotmWinner,
    FriendlyInvite,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::JoinRequest => "join_request",
            NotificationKind::JoinApproved => "join_approved",
            NotificationKind::JoinDeclined => "join_declined",
            NotificationKind::PlayRequest => "play_request",
            NotificationKind::PlayRequestAccepted => "play_request_accepted",
            NotificationKind::PlayRequestDeclined => "play_request_declined",
            NotificationKind::ScoreRequest => "score_request",
            NotificationKind::ScoreConfirmed => "score_confirmed",
            NotificationKind::ScoreNull => "score_null",
            NotificationKind::MotmWinner => "motm_winner",
            NotificationKind::FriendlyInvite => "friendly_invite",
        }
    }
}

/// Structured payload attached to a notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NotificationPayload {
    pub fn for_match(match_id: &str) -> Self {
        Self { match_id: Some(match_id.to_string()), ..Default::default() }
    }

    pub fn with_player(mut self, player_id: &str) -> Self {
        self.player_id = Some(player_id.to_string());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A persisted in-app notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: &str, kind: NotificationKind, payload: NotificationPayload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            payload,
            read: false,
            created_at: Utc::now(),
        }
    }
}

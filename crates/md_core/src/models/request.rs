//! Opponent negotiation requests: friendly invites and public challenges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who initiated the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDirection {
    /// Sent by the match creator to a specific team (friendly match)
    Invite,
    /// Sent by another team's captain to the creator (public match)
    Challenge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A request binding `team_id` as the candidate opponent of `match_id`.
///
/// At most one request per match ever reaches `Accepted`; accepting one
/// forces every sibling pending request to `Rejected`. Resolved rows are
/// immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub id: String,
    pub match_id: String,
    /// Requesting team (challenge) or invited team (invite)
    pub team_id: String,
    pub direction: RequestDirection,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl MatchRequest {
    pub fn new(match_id: &str, team_id: &str, direction: RequestDirection) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            team_id: team_id.to_string(),
            direction,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

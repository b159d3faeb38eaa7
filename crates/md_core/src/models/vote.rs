//! Man-of-the-Match votes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One participant's MOTM vote. Append-only; one row per (match, voter).
///
/// `seq` is the store insertion sequence and is the primary tie-break key
/// when two candidates finish level on votes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotmVote {
    pub id: String,
    pub match_id: String,
    pub voter_id: String,
    pub voted_player_id: String,
    /// Store-assigned insertion sequence, 0 until persisted
    #[serde(default)]
    pub seq: u64,
    pub created_at: DateTime<Utc>,
}

impl MotmVote {
    pub fn new(match_id: &str, voter_id: &str, voted_player_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            voter_id: voter_id.to_string(),
            voted_player_id: voted_player_id.to_string(),
            seq: 0,
            created_at: Utc::now(),
        }
    }
}

//! Post-match peer ratings under the anti-inflation budget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most opponents one submission may rate
pub const MAX_RATING_TARGETS: usize = 10;

/// Budget multiplier: one rater may distribute at most
/// `opponent_count * RATING_BUDGET_PER_OPPONENT` points in a match.
/// Deliberately below the per-rating maximum of 10 to blunt uniform-10
/// inflation while still allowing generous scores.
pub const RATING_BUDGET_PER_OPPONENT: u32 = 7;

/// One rating item as submitted by a rater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rated_id: String,
    /// 1 to 10 inclusive
    pub value: u8,
}

/// A persisted rating row. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub match_id: String,
    pub rater_id: String,
    pub rated_id: String,
    pub value: u8,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(match_id: &str, rater_id: &str, entry: &RatingEntry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            rater_id: rater_id.to_string(),
            rated_id: entry.rated_id.clone(),
            value: entry.value,
            created_at: Utc::now(),
        }
    }
}

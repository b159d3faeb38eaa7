//! Roster membership: one row per player per match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which of the two bound teams a roster row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn opposite(&self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

/// Join workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStatus {
    Pending,
    Approved,
    Declined,
}

/// A player's membership request/row for one side of one match.
///
/// Rows are created on join request, mutated by approve/decline, never
/// deleted. Approved rows per (match, side) are capped at the match's
/// `max_players_per_team`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPlayer {
    pub id: String,
    pub match_id: String,
    pub player_id: String,
    pub team_side: TeamSide,
    pub join_status: JoinStatus,
    pub created_at: DateTime<Utc>,
}

impl MatchPlayer {
    pub fn new(match_id: &str, player_id: &str, team_side: TeamSide) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            team_side,
            join_status: JoinStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Pre-approved row, used when the creating captain auto-joins.
    pub fn approved(match_id: &str, player_id: &str, team_side: TeamSide) -> Self {
        let mut row = Self::new(match_id, player_id, team_side);
        row.join_status = JoinStatus::Approved;
        row
    }

    pub fn is_approved(&self) -> bool {
        self.join_status == JoinStatus::Approved
    }
}

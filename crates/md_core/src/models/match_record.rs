//! Match entity and lifecycle state.
//!
//! A match is created by a captain with only its own team bound
//! (`team_b_id = None`). The negotiation workflow binds the opponent exactly
//! once, the score consensus protocol drives the terminal transition, and
//! terminal matches are retained for history, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roster::TeamSide;

/// How a match acquires its second team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Open to a challenge from any other team
    Public,
    /// Creator privately invites a specific opponent team
    Friendly,
}

/// Match lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Created, waiting for an opponent
    Pending,
    /// Opponent bound, roster filling until kickoff
    Confirmed,
    /// Kicked off
    InProgress,
    /// Score agreed by both captains
    Completed,
    /// Called off before play
    Cancelled,
    /// Score could not be reconciled after one retry
    NullResult,
}

impl MatchStatus {
    /// Terminal states are retained for history and reject every mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled | MatchStatus::NullResult)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Confirmed => "confirmed",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
            MatchStatus::NullResult => "null_result",
        };
        write!(f, "{}", name)
    }
}

/// A full-time score tuple as submitted by one captain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePair {
    pub score_a: u8,
    pub score_b: u8,
}

impl ScorePair {
    pub fn new(score_a: u8, score_b: u8) -> Self {
        Self { score_a, score_b }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub match_type: MatchType,
    /// Owner/creator team, set at creation, immutable
    pub team_a_id: String,
    /// Opponent team; never set at creation, bound exactly once by an
    /// accepted request
    pub team_b_id: Option<String>,
    pub status: MatchStatus,
    pub max_players_per_team: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_a: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_b: Option<u8>,
    /// Most recent tuple submitted by side A's captain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_submitted_by_a: Option<ScorePair>,
    /// Most recent tuple submitted by side B's captain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_submitted_by_b: Option<ScorePair>,
    /// True while a mismatched pair awaits fresh submissions
    pub score_conflict: bool,
    /// 0, 1, or 2; the match becomes `NullResult` at 2
    pub score_conflict_count: u8,
    pub motm_voting_open: bool,
    /// One-shot guard for the points award on the completed transition
    pub points_awarded: bool,
    /// Player id of the creating captain
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kickoff_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn new(
        match_type: MatchType,
        team_a_id: &str,
        created_by: &str,
        max_players_per_team: u8,
        kickoff_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_type,
            team_a_id: team_a_id.to_string(),
            team_b_id: None,
            status: MatchStatus::Pending,
            max_players_per_team,
            score_a: None,
            score_b: None,
            score_submitted_by_a: None,
            score_submitted_by_b: None,
            score_conflict: false,
            score_conflict_count: 0,
            motm_voting_open: false,
            points_awarded: false,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            kickoff_at,
        }
    }

    /// Which side a team id is bound to, if any.
    pub fn side_of_team(&self, team_id: &str) -> Option<TeamSide> {
        if self.team_a_id == team_id {
            Some(TeamSide::A)
        } else if self.team_b_id.as_deref() == Some(team_id) {
            Some(TeamSide::B)
        } else {
            None
        }
    }

    /// The team id bound to a side, if bound.
    pub fn team_for_side(&self, side: TeamSide) -> Option<&str> {
        match side {
            TeamSide::A => Some(self.team_a_id.as_str()),
            TeamSide::B => self.team_b_id.as_deref(),
        }
    }

    pub fn submitted_for(&self, side: TeamSide) -> Option<ScorePair> {
        match side {
            TeamSide::A => self.score_submitted_by_a,
            TeamSide::B => self.score_submitted_by_b,
        }
    }

    pub fn set_submitted(&mut self, side: TeamSide, pair: Option<ScorePair>) {
        match side {
            TeamSide::A => self.score_submitted_by_a = pair,
            TeamSide::B => self.score_submitted_by_b = pair,
        }
    }

    /// Joins are accepted until the match reaches a terminal state.
    pub fn accepts_joins(&self) -> bool {
        !self.status.is_terminal()
    }
}

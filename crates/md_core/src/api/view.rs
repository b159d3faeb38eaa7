//! Aggregated read models for the transport layer.
//!
//! Captains watch roster fill state and score progress from these views;
//! assembling them under the match lane means the counts, rosters, and
//! pending queue always describe one consistent snapshot.

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::Result;
use crate::models::{
    JoinStatus, MatchRequest, MatchStatus, MatchType, ScorePair, TeamSide,
};

/// One roster slot in the match view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub match_player_id: String,
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub team_side: TeamSide,
    pub join_status: JoinStatus,
}

/// Full aggregated state of one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub match_id: String,
    pub match_type: MatchType,
    pub status: MatchStatus,
    pub team_a_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_b_id: Option<String>,
    pub max_players_per_team: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_a: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_b: Option<u8>,
    pub motm_voting_open: bool,
    /// Approved members, split by side
    pub roster_a: Vec<RosterEntry>,
    pub roster_b: Vec<RosterEntry>,
    /// Join requests still waiting on a captain
    pub pending_requests: Vec<RosterEntry>,
    /// Live approved counts, so captains see fill state without
    /// recomputation
    pub count_a: usize,
    pub count_b: usize,
    /// Negotiation requests for the match (all states)
    pub requests: Vec<MatchRequest>,
}

/// Visible state of the score consensus protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreStatusView {
    pub match_id: String,
    pub status: MatchStatus,
    pub submitted_by_a: bool,
    pub submitted_by_b: bool,
    pub score_conflict: bool,
    pub score_conflict_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_a: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_b: Option<u8>,
    pub motm_voting_open: bool,
}

impl MatchView {
    /// JSON form for transport layers that speak strings.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl ScoreStatusView {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Engine {
    /// The aggregated match view, assembled from one consistent snapshot.
    pub fn get_by_id(&self, match_id: &str) -> Result<MatchView> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let m = self.must_match(match_id)?;
        let rows = self.store().match_players_for_match(match_id)?;
        let requests = self.store().requests_for_match(match_id)?;

        let mut roster_a = Vec::new();
        let mut roster_b = Vec::new();
        let mut pending_requests = Vec::new();
        for row in rows {
            let entry = RosterEntry {
                match_player_id: row.id.clone(),
                player_id: row.player_id.clone(),
                player_name: self.store().player_by_id(&row.player_id)?.map(|p| p.name),
                team_side: row.team_side,
                join_status: row.join_status,
            };
            match row.join_status {
                JoinStatus::Approved => match row.team_side {
                    TeamSide::A => roster_a.push(entry),
                    TeamSide::B => roster_b.push(entry),
                },
                JoinStatus::Pending => pending_requests.push(entry),
                JoinStatus::Declined => {}
            }
        }

        Ok(MatchView {
            match_id: m.id.clone(),
            match_type: m.match_type,
            status: m.status,
            team_a_id: m.team_a_id.clone(),
            team_b_id: m.team_b_id.clone(),
            max_players_per_team: m.max_players_per_team,
            score_a: m.score_a,
            score_b: m.score_b,
            motm_voting_open: m.motm_voting_open,
            count_a: roster_a.len(),
            count_b: roster_b.len(),
            roster_a,
            roster_b,
            pending_requests,
            requests,
        })
    }

    /// Where the score consensus protocol currently stands.
    pub fn get_score_status(&self, match_id: &str) -> Result<ScoreStatusView> {
        let m = self.must_match(match_id)?;
        let submitted = |pair: Option<ScorePair>| pair.is_some();
        Ok(ScoreStatusView {
            match_id: m.id.clone(),
            status: m.status,
            submitted_by_a: submitted(m.score_submitted_by_a),
            submitted_by_b: submitted(m.score_submitted_by_b),
            score_conflict: m.score_conflict,
            score_conflict_count: m.score_conflict_count,
            score_a: m.score_a,
            score_b: m.score_b,
            motm_voting_open: m.motm_voting_open,
        })
    }
}

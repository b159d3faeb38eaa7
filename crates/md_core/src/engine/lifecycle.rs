//! Match creation, kickoff, and cancellation.

use chrono::{DateTime, Utc};

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{
    Match, MatchPlayer, MatchStatus, MatchType, NotificationKind, NotificationPayload, TeamSide,
};

/// Parameters for `create_match`.
#[derive(Debug, Clone)]
pub struct CreateMatch {
    pub match_type: MatchType,
    /// The creating captain's team; becomes side A
    pub team_id: String,
    pub max_players_per_team: u8,
    pub kickoff_at: Option<DateTime<Utc>>,
}

impl Engine {
    /// Create a match in `Pending` with no opponent bound. The creating
    /// captain is auto-joined as an approved side-A participant.
    pub fn create_match(&self, caller_id: &str, params: CreateMatch) -> Result<Match> {
        if params.max_players_per_team == 0 {
            return Err(EngineError::InvalidCapacity { value: params.max_players_per_team });
        }
        let team = self.must_captain(&params.team_id, caller_id, "create a match")?;

        let m = Match::new(
            params.match_type,
            &team.id,
            caller_id,
            params.max_players_per_team,
            params.kickoff_at,
        );
        let m = self.store().insert_match(m)?;
        self.store()
            .insert_match_player(MatchPlayer::approved(&m.id, caller_id, TeamSide::A))?;

        log::debug!("match {} created by {}", m.id, caller_id);
        Ok(m)
    }

    /// Kickoff: `Confirmed` -> `InProgress`. Either captain may start.
    pub fn start_match(&self, caller_id: &str, match_id: &str) -> Result<Match> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut m = self.must_match(match_id)?;
        if m.status != MatchStatus::Confirmed {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        self.captain_of_either_side(&m, caller_id, "start the match")?;

        m.status = MatchStatus::InProgress;
        Ok(self.store().update_match(&m)?)
    }

    /// Call off a match before play. Creating captain only; allowed from
    /// `Pending` or `Confirmed`. Terminal: the row is retained, every later
    /// mutation is rejected.
    pub fn cancel_match(&self, caller_id: &str, match_id: &str) -> Result<Match> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut m = self.must_match(match_id)?;
        if !matches!(m.status, MatchStatus::Pending | MatchStatus::Confirmed) {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        self.must_captain(&m.team_a_id, caller_id, "cancel the match")?;

        m.status = MatchStatus::Cancelled;
        let m = self.store().update_match(&m)?;

        let payload = NotificationPayload::for_match(&m.id).with_message("Match cancelled");
        for row in self.store().match_players_for_match(&m.id)? {
            if row.is_approved() && row.player_id != caller_id {
                self.notify(
                    &row.player_id,
                    NotificationKind::PlayRequestDeclined,
                    payload.clone(),
                );
            }
        }
        if m.team_b_id.is_some() {
            let captain_b = self.captain_of_side(&m, TeamSide::B)?;
            if captain_b != caller_id {
                self.notify(&captain_b, NotificationKind::PlayRequestDeclined, payload);
            }
        }

        Ok(m)
    }

    /// The caller's team, provided they captain either bound side.
    fn captain_of_either_side(
        &self,
        m: &Match,
        caller_id: &str,
        action: &'static str,
    ) -> Result<TeamSide> {
        for side in [TeamSide::A, TeamSide::B] {
            if let Some(team_id) = m.team_for_side(side) {
                if self.must_team(team_id)?.is_captain(caller_id) {
                    return Ok(side);
                }
            }
        }
        Err(EngineError::NotCaptain { action })
    }
}

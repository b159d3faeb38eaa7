//! Match coordination engine.
//!
//! A stateless request-handling facade over the entity store. Each captain
//! or player action arrives as an independent call; the engine validates it,
//! applies the transition, and dispatches notifications. The only blocking
//! points are the store boundary and the per-match serialization lanes that
//! make the first-writer-wins races (opponent binding, roster admission)
//! behave exactly like sequential execution.
//!
//! One submodule per workflow:
//! - `lifecycle`: create / start / cancel
//! - `negotiation`: friendly invites and public challenges
//! - `roster`: join request and approval with per-side capacity
//! - `score`: double-submission score consensus
//! - `motm`: man-of-the-match voting and quorum finalization
//! - `rating`: peer ratings under the anti-inflation budget
//! - `points`: league point awards on a confirmed result

pub mod lifecycle;
pub mod motm;
pub mod negotiation;
pub mod points;
pub mod rating;
pub mod roster;
pub mod score;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{EngineError, Result};
use crate::models::{Match, NotificationKind, NotificationPayload, Player, Team};
use crate::notify::NotificationSink;
use crate::store::MatchStore;

pub use motm::VoteOutcome;
pub use points::PointsOutcome;
pub use score::ScoreOutcome;

pub struct Engine {
    store: Arc<dyn MatchStore>,
    sink: Arc<dyn NotificationSink>,
    /// Per-match serialization lanes. An operation that must read, check,
    /// and write as one unit holds its match's lane for the whole window,
    /// so a concurrent loser observes the committed state and fails with
    /// the same error a sequential caller would get.
    lanes: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine {
    pub fn new(store: Arc<dyn MatchStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink, lanes: Mutex::new(HashMap::new()) }
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    /// Get or create the serialization lane for a match.
    pub(crate) fn lane(&self, match_id: &str) -> Arc<Mutex<()>> {
        let mut lanes = self.lanes.lock().expect("lane registry poisoned");
        lanes.entry(match_id.to_string()).or_default().clone()
    }

    /// Fire-and-forget dispatch. Sink failures are logged and swallowed;
    /// they never fail or roll back the triggering operation.
    pub(crate) fn notify(
        &self,
        user_id: &str,
        kind: NotificationKind,
        payload: NotificationPayload,
    ) {
        if let Err(e) = self.sink.create_notification(user_id, kind, payload) {
            log::warn!("notification {} to {} dropped: {}", kind.as_str(), user_id, e);
        }
    }

    // ========================
    // Common lookups
    // ========================

    pub(crate) fn must_match(&self, match_id: &str) -> Result<Match> {
        self.store
            .match_by_id(match_id)?
            .ok_or_else(|| EngineError::NotFound { entity: "match", id: match_id.to_string() })
    }

    pub(crate) fn must_team(&self, team_id: &str) -> Result<Team> {
        self.store
            .team_by_id(team_id)?
            .ok_or_else(|| EngineError::NotFound { entity: "team", id: team_id.to_string() })
    }

    pub(crate) fn must_player(&self, player_id: &str) -> Result<Player> {
        self.store
            .player_by_id(player_id)?
            .ok_or_else(|| EngineError::NotFound { entity: "player", id: player_id.to_string() })
    }

    /// The team, provided the caller is its captain.
    pub(crate) fn must_captain(
        &self,
        team_id: &str,
        caller_id: &str,
        action: &'static str,
    ) -> Result<Team> {
        let team = self.must_team(team_id)?;
        if !team.is_captain(caller_id) {
            return Err(EngineError::NotCaptain { action });
        }
        Ok(team)
    }

    /// Captain (player id) of the team bound to a side of a match.
    pub(crate) fn captain_of_side(
        &self,
        m: &Match,
        side: crate::models::TeamSide,
    ) -> Result<String> {
        let team_id = m
            .team_for_side(side)
            .ok_or(EngineError::SideNotBound { side })?
            .to_string();
        Ok(self.must_team(&team_id)?.captain_id)
    }
}

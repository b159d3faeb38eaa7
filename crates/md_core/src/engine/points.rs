//! League point awards on a confirmed result.
//!
//! Runs once per match, on the transition into `Completed`. The
//! `points_awarded` flag on the match row is the one-shot guard: a re-run
//! observes it and changes nothing.

use serde::{Deserialize, Serialize};

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{JoinStatus, Match, MatchStatus, TeamSide};

/// Points for every approved member of the winning side
pub const WIN_POINTS: u32 = 3;
/// Points for every approved participant of a drawn match
pub const DRAW_POINTS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsOutcome {
    /// Points applied; `None` winning side means a draw
    Awarded { winning_side: Option<TeamSide> },
    /// The one-shot guard had already fired; nothing changed
    AlreadyAwarded,
}

impl Engine {
    /// Re-entry point for the award. The score consensus transition calls
    /// the internal application directly; this wrapper exists so an
    /// operator (or a replayed event) can safely re-trigger it.
    pub fn award_match_points(&self, match_id: &str) -> Result<PointsOutcome> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut m = self.must_match(match_id)?;
        if m.status != MatchStatus::Completed {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        let outcome = self.apply_match_points(&mut m)?;
        if outcome != PointsOutcome::AlreadyAwarded {
            self.store().update_match(&m)?;
        }
        Ok(outcome)
    }

    /// Apply the award to every approved participant and set the one-shot
    /// guard. The caller persists the match row.
    pub(crate) fn apply_match_points(&self, m: &mut Match) -> Result<PointsOutcome> {
        if m.points_awarded {
            return Ok(PointsOutcome::AlreadyAwarded);
        }
        let (score_a, score_b) = match (m.score_a, m.score_b) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(EngineError::WrongStatus { found: m.status }),
        };

        let winning_side = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Some(TeamSide::A),
            std::cmp::Ordering::Less => Some(TeamSide::B),
            std::cmp::Ordering::Equal => None,
        };

        for row in self.store().match_players_for_match(&m.id)? {
            if row.join_status != JoinStatus::Approved {
                continue;
            }
            let points = match winning_side {
                Some(winner) if row.team_side == winner => WIN_POINTS,
                Some(_) => 0,
                None => DRAW_POINTS,
            };
            if points > 0 {
                let mut player = self.must_player(&row.player_id)?;
                player.season_points += points;
                self.store().update_player(&player)?;
            }
        }

        m.points_awarded = true;
        log::info!(
            "points awarded for match {}: winner {:?}",
            m.id,
            winning_side
        );
        Ok(PointsOutcome::Awarded { winning_side })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::fixture;
    use crate::models::MatchType;
    use crate::store::MatchStore;

    #[test]
    fn test_win_awards_three_to_winners_only() {
        let fx = fixture();
        let (mut m, _ta, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let side_a = fx.approved_players(&m, TeamSide::A, 2, "Home");
        let side_b = fx.approved_players(&m, TeamSide::B, 2, "Away");

        m.status = MatchStatus::Completed;
        m.score_a = Some(2);
        m.score_b = Some(1);
        fx.store.update_match(&m).unwrap();

        let outcome = fx.engine.award_match_points(&m.id).unwrap();
        assert_eq!(outcome, PointsOutcome::Awarded { winning_side: Some(TeamSide::A) });

        for p in &side_a {
            assert_eq!(fx.reload_player(&p.id).season_points, 3);
        }
        for p in &side_b {
            assert_eq!(fx.reload_player(&p.id).season_points, 0);
        }
    }

    #[test]
    fn test_draw_awards_one_to_everyone() {
        let fx = fixture();
        let (mut m, _ta, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let side_a = fx.approved_players(&m, TeamSide::A, 2, "Home");
        let side_b = fx.approved_players(&m, TeamSide::B, 2, "Away");

        m.status = MatchStatus::Completed;
        m.score_a = Some(1);
        m.score_b = Some(1);
        fx.store.update_match(&m).unwrap();

        let outcome = fx.engine.award_match_points(&m.id).unwrap();
        assert_eq!(outcome, PointsOutcome::Awarded { winning_side: None });

        for p in side_a.iter().chain(side_b.iter()) {
            assert_eq!(fx.reload_player(&p.id).season_points, 1);
        }
    }

    #[test]
    fn test_rerun_is_a_noop() {
        let fx = fixture();
        let (mut m, _ta, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let side_a = fx.approved_players(&m, TeamSide::A, 2, "Home");
        fx.approved_players(&m, TeamSide::B, 2, "Away");

        m.status = MatchStatus::Completed;
        m.score_a = Some(3);
        m.score_b = Some(0);
        fx.store.update_match(&m).unwrap();

        fx.engine.award_match_points(&m.id).unwrap();
        let second = fx.engine.award_match_points(&m.id).unwrap();
        assert_eq!(second, PointsOutcome::AlreadyAwarded);

        for p in &side_a {
            assert_eq!(fx.reload_player(&p.id).season_points, 3, "no double award");
        }
    }

    #[test]
    fn test_award_rejected_unless_completed() {
        let fx = fixture();
        let (m, _ta, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);

        let err = fx.engine.award_match_points(&m.id).unwrap_err();
        assert!(matches!(err, EngineError::WrongStatus { found: MatchStatus::Confirmed }));
    }

    #[test]
    fn test_pending_rows_receive_nothing() {
        let fx = fixture();
        let (mut m, team_a, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        fx.approved_players(&m, TeamSide::A, 1, "Home");
        fx.approved_players(&m, TeamSide::B, 1, "Away");
        let pending = fx.player("Benched");
        fx.engine.join_match(&pending.id, &m.id, &team_a.id, TeamSide::A).unwrap();

        m.status = MatchStatus::Completed;
        m.score_a = Some(1);
        m.score_b = Some(0);
        fx.store.update_match(&m).unwrap();

        fx.engine.award_match_points(&m.id).unwrap();
        assert_eq!(fx.reload_player(&pending.id).season_points, 0);
    }
}

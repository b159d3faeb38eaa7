//! Join workflow with per-side capacity.
//!
//! A join request is a pending roster row; the side's captain admits or
//! declines it. Capacity is checked at request time and re-checked at the
//! admitting approve step, both under the match lane, so approved rows per
//! side can never exceed `max_players_per_team` even with concurrent calls
//! racing at the boundary.

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{
    JoinStatus, MatchPlayer, NotificationKind, NotificationPayload, TeamSide,
};

impl Engine {
    /// Ask to join one side of a match. Creates a pending roster row and
    /// notifies that side's captain.
    pub fn join_match(
        &self,
        caller_id: &str,
        match_id: &str,
        team_id: &str,
        team_side: TeamSide,
    ) -> Result<MatchPlayer> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let m = self.must_match(match_id)?;
        if !m.accepts_joins() {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        if m.team_for_side(team_side) != Some(team_id) {
            return Err(EngineError::SideNotBound { side: team_side });
        }
        self.must_player(caller_id)?;

        let already = self
            .store()
            .match_players_for_match(match_id)?
            .iter()
            .any(|row| row.player_id == caller_id);
        if already {
            return Err(EngineError::AlreadyJoined);
        }

        let approved = self.store().approved_count_by_side(match_id, team_side)?;
        if approved >= m.max_players_per_team as usize {
            return Err(EngineError::SideFull {
                side: team_side,
                capacity: m.max_players_per_team,
            });
        }

        let row = self
            .store()
            .insert_match_player(MatchPlayer::new(match_id, caller_id, team_side))?;

        let captain = self.captain_of_side(&m, team_side)?;
        self.notify(
            &captain,
            NotificationKind::JoinRequest,
            NotificationPayload::for_match(match_id).with_player(caller_id),
        );
        Ok(row)
    }

    /// Admit a pending join. Captain of the row's side only. Capacity is
    /// re-checked here: approval is the step that consumes a slot.
    pub fn approve_join(&self, caller_id: &str, match_player_id: &str) -> Result<MatchPlayer> {
        let row = self.must_match_player(match_player_id)?;
        let lane = self.lane(&row.match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut row = self.must_match_player(match_player_id)?;
        let m = self.must_match(&row.match_id)?;
        if !m.accepts_joins() {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        let side_team = m
            .team_for_side(row.team_side)
            .ok_or(EngineError::SideNotBound { side: row.team_side })?
            .to_string();
        self.must_captain(&side_team, caller_id, "approve join requests")?;
        if row.join_status != JoinStatus::Pending {
            return Err(EngineError::JoinResolved);
        }

        let approved = self.store().approved_count_by_side(&row.match_id, row.team_side)?;
        if approved >= m.max_players_per_team as usize {
            return Err(EngineError::SideFull {
                side: row.team_side,
                capacity: m.max_players_per_team,
            });
        }

        row.join_status = JoinStatus::Approved;
        let row = self.store().update_match_player(&row)?;

        self.notify(
            &row.player_id,
            NotificationKind::JoinApproved,
            NotificationPayload::for_match(&row.match_id),
        );
        Ok(row)
    }

    /// Turn down a pending join. Captain of the row's side only.
    pub fn decline_join(&self, caller_id: &str, match_player_id: &str) -> Result<MatchPlayer> {
        let row = self.must_match_player(match_player_id)?;
        let lane = self.lane(&row.match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut row = self.must_match_player(match_player_id)?;
        let m = self.must_match(&row.match_id)?;
        let side_team = m
            .team_for_side(row.team_side)
            .ok_or(EngineError::SideNotBound { side: row.team_side })?
            .to_string();
        self.must_captain(&side_team, caller_id, "decline join requests")?;
        if row.join_status != JoinStatus::Pending {
            return Err(EngineError::JoinResolved);
        }

        row.join_status = JoinStatus::Declined;
        let row = self.store().update_match_player(&row)?;

        self.notify(
            &row.player_id,
            NotificationKind::JoinDeclined,
            NotificationPayload::for_match(&row.match_id),
        );
        Ok(row)
    }

    /// A player's own roster row for a match, if any.
    pub fn my_join_status(&self, caller_id: &str, match_id: &str) -> Result<Option<MatchPlayer>> {
        self.must_match(match_id)?;
        let row = self
            .store()
            .match_players_for_match(match_id)?
            .into_iter()
            .find(|row| row.player_id == caller_id);
        Ok(row)
    }

    fn must_match_player(&self, id: &str) -> Result<MatchPlayer> {
        self.store().match_player_by_id(id)?.ok_or_else(|| EngineError::NotFound {
            entity: "match_player",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::fixture;
    use crate::models::{MatchStatus, MatchType};
    use crate::store::MatchStore;

    #[test]
    fn test_join_creates_pending_row_and_notifies_captain() {
        let fx = fixture();
        let (m, team_a, captain_a, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");

        let row = fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap();
        assert_eq!(row.join_status, JoinStatus::Pending);

        let sent = fx.sink.sent_to(&captain_a.id);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::JoinRequest);
        assert_eq!(sent[0].payload.player_id.as_deref(), Some(joiner.id.as_str()));
    }

    #[test]
    fn test_join_rejects_unbound_side() {
        let fx = fixture();
        let (team_a, _ca) = fx.team_with_captain("Rovers");
        let m = fx.pending_match(MatchType::Public, &team_a, 7);
        let joiner = fx.player("Joiner");

        // No opponent bound yet: side B does not exist
        let err =
            fx.engine.join_match(&joiner.id, &m.id, "some-team", TeamSide::B).unwrap_err();
        assert!(matches!(err, EngineError::SideNotBound { side: TeamSide::B }));
    }

    #[test]
    fn test_join_rejects_mismatched_team_for_side() {
        let fx = fixture();
        let (m, _ta, _ca, team_b, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");

        let err = fx.engine.join_match(&joiner.id, &m.id, &team_b.id, TeamSide::A).unwrap_err();
        assert!(matches!(err, EngineError::SideNotBound { side: TeamSide::A }));
    }

    #[test]
    fn test_join_duplicate_rejected() {
        let fx = fixture();
        let (m, team_a, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");

        fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap();
        let err = fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyJoined));
    }

    #[test]
    fn test_join_rejected_at_capacity() {
        let fx = fixture();
        let (m, team_a, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 2);
        fx.approved_players(&m, TeamSide::A, 2, "Starter");
        let late = fx.player("Late");

        let err = fx.engine.join_match(&late.id, &m.id, &team_a.id, TeamSide::A).unwrap_err();
        assert!(matches!(err, EngineError::SideFull { side: TeamSide::A, capacity: 2 }));
    }

    #[test]
    fn test_approve_flips_row_and_notifies_player() {
        let fx = fixture();
        let (m, team_a, captain_a, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");
        let row = fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap();

        let approved = fx.engine.approve_join(&captain_a.id, &row.id).unwrap();
        assert_eq!(approved.join_status, JoinStatus::Approved);
        assert!(fx
            .sink
            .sent_to(&joiner.id)
            .iter()
            .any(|n| n.kind == NotificationKind::JoinApproved));
    }

    #[test]
    fn test_approve_requires_side_captain() {
        let fx = fixture();
        let (m, team_a, _ca, _tb, captain_b) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");
        let row = fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap();

        // Captain of the other side cannot admit onto side A
        let err = fx.engine.approve_join(&captain_b.id, &row.id).unwrap_err();
        assert!(matches!(err, EngineError::NotCaptain { .. }));
    }

    #[test]
    fn test_approve_beyond_capacity_rejected() {
        let fx = fixture();
        let (m, team_a, captain_a, _tb, _cb) = fx.confirmed_match(MatchType::Public, 2);

        let rows: Vec<_> = (0..3)
            .map(|i| {
                let p = fx.player(&format!("Joiner {}", i + 1));
                fx.engine.join_match(&p.id, &m.id, &team_a.id, TeamSide::A).unwrap()
            })
            .collect();

        fx.engine.approve_join(&captain_a.id, &rows[0].id).unwrap();
        fx.engine.approve_join(&captain_a.id, &rows[1].id).unwrap();
        let err = fx.engine.approve_join(&captain_a.id, &rows[2].id).unwrap_err();
        assert!(matches!(err, EngineError::SideFull { side: TeamSide::A, capacity: 2 }));

        assert_eq!(fx.store.approved_count_by_side(&m.id, TeamSide::A).unwrap(), 2);
    }

    #[test]
    fn test_decline_flips_row_and_notifies_player() {
        let fx = fixture();
        let (m, team_a, captain_a, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");
        let row = fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap();

        let declined = fx.engine.decline_join(&captain_a.id, &row.id).unwrap();
        assert_eq!(declined.join_status, JoinStatus::Declined);
        assert!(fx
            .sink
            .sent_to(&joiner.id)
            .iter()
            .any(|n| n.kind == NotificationKind::JoinDeclined));

        // A resolved row cannot be re-approved
        let err = fx.engine.approve_join(&captain_a.id, &row.id).unwrap_err();
        assert!(matches!(err, EngineError::JoinResolved));
    }

    #[test]
    fn test_my_join_status() {
        let fx = fixture();
        let (m, team_a, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");

        assert!(fx.engine.my_join_status(&joiner.id, &m.id).unwrap().is_none());
        fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap();
        let row = fx.engine.my_join_status(&joiner.id, &m.id).unwrap().unwrap();
        assert_eq!(row.join_status, JoinStatus::Pending);
    }

    #[test]
    fn test_join_rejected_on_terminal_match() {
        let fx = fixture();
        let (mut m, team_a, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let joiner = fx.player("Joiner");

        m.status = MatchStatus::Completed;
        fx.store.update_match(&m).unwrap();

        let err = fx.engine.join_match(&joiner.id, &m.id, &team_a.id, TeamSide::A).unwrap_err();
        assert!(matches!(err, EngineError::WrongStatus { found: MatchStatus::Completed }));
    }

    #[test]
    fn test_concurrent_approvals_never_exceed_capacity() {
        use std::thread;

        let fx = fixture();
        let (m, team_a, captain_a, _tb, _cb) = fx.confirmed_match(MatchType::Public, 3);

        let rows: Vec<_> = (0..8)
            .map(|i| {
                let p = fx.player(&format!("Joiner {}", i + 1));
                fx.engine.join_match(&p.id, &m.id, &team_a.id, TeamSide::A).unwrap()
            })
            .collect();

        let handles: Vec<_> = rows
            .into_iter()
            .map(|row| {
                let engine = fx.engine.clone();
                let caller = captain_a.id.clone();
                thread::spawn(move || engine.approve_join(&caller, &row.id).is_ok())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap() as usize).sum();
        assert_eq!(admitted, 3, "exactly capacity-many approvals may win");
        assert_eq!(fx.store.approved_count_by_side(&m.id, TeamSide::A).unwrap(), 3);
    }
}

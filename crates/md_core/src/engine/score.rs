//! Double-submission score consensus.
//!
//! Each captain independently reports a full-time score. Equal tuples
//! confirm the match; a mismatch burns one of two strikes. Strike one
//! clears both submissions and grants a single retry; strike two declares
//! the match a null result, with no points and no MOTM.
//!
//! Resubmitting before the opposite side has submitted overwrites that
//! side's pending tuple; it never duplicates it. The whole step runs under
//! the match lane so the overwrite is atomic per side.

use serde::{Deserialize, Serialize};

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{
    Match, MatchStatus, NotificationKind, NotificationPayload, ScorePair, TeamSide,
};

/// Mismatched pairs tolerated before the match is declared unresolved.
/// One honest data-entry mistake is forgiven; the second mismatch ends it.
pub const MAX_SCORE_CONFLICTS: u8 = 2;

/// Visible result of a score submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutcome {
    /// Recorded; waiting on the other side's submission
    Waiting,
    /// Both sides agreed; the match is completed
    Confirmed { score_a: u8, score_b: u8 },
    /// Mismatch; both submissions cleared, one retry remains
    ConflictRetry,
    /// Second mismatch; the match is a null result
    NullResult,
}

impl Engine {
    /// Submit (or resubmit) a side's full-time score. Captain of that side
    /// only; the match must have an opponent bound and not be terminal.
    pub fn submit_score(
        &self,
        caller_id: &str,
        match_id: &str,
        side: TeamSide,
        score_a: u8,
        score_b: u8,
    ) -> Result<ScoreOutcome> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut m = self.must_match(match_id)?;
        if !matches!(m.status, MatchStatus::Confirmed | MatchStatus::InProgress) {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        let side_team = m
            .team_for_side(side)
            .ok_or(EngineError::SideNotBound { side })?
            .to_string();
        self.must_captain(&side_team, caller_id, "submit a score")?;

        let submitted = ScorePair::new(score_a, score_b);
        m.set_submitted(side, Some(submitted));

        let other = match m.submitted_for(side.opposite()) {
            Some(pair) => pair,
            None => {
                self.store().update_match(&m)?;
                let other_captain = self.captain_of_side(&m, side.opposite())?;
                self.notify(
                    &other_captain,
                    NotificationKind::ScoreRequest,
                    NotificationPayload::for_match(match_id)
                        .with_message("The opposing captain submitted a score; waiting on your submission"),
                );
                return Ok(ScoreOutcome::Waiting);
            }
        };

        if submitted == other {
            return self.confirm_score(&mut m, submitted);
        }
        self.record_conflict(&mut m)
    }

    /// Both captains agreed: complete the match, award points, open voting.
    fn confirm_score(
        &self,
        m: &mut Match,
        agreed: ScorePair,
    ) -> Result<ScoreOutcome> {
        m.status = MatchStatus::Completed;
        m.score_a = Some(agreed.score_a);
        m.score_b = Some(agreed.score_b);
        m.score_conflict = false;
        m.motm_voting_open = true;
        self.apply_match_points(m)?;
        self.store().update_match(m)?;

        self.notify_both_captains(
            m,
            NotificationKind::ScoreConfirmed,
            &format!("Final score confirmed: {} - {}", agreed.score_a, agreed.score_b),
        )?;
        Ok(ScoreOutcome::Confirmed { score_a: agreed.score_a, score_b: agreed.score_b })
    }

    /// The tuples differ: burn a strike.
    fn record_conflict(&self, m: &mut Match) -> Result<ScoreOutcome> {
        m.score_conflict_count += 1;

        if m.score_conflict_count < MAX_SCORE_CONFLICTS {
            // Strike one: force a fresh pair of submissions
            m.score_conflict = true;
            m.set_submitted(TeamSide::A, None);
            m.set_submitted(TeamSide::B, None);
            self.store().update_match(m)?;

            self.notify_both_captains(
                m,
                NotificationKind::ScoreRequest,
                "Submitted scores did not match. Last chance: one resubmission attempt remains",
            )?;
            return Ok(ScoreOutcome::ConflictRetry);
        }

        // Strike two: unresolvable
        m.status = MatchStatus::NullResult;
        m.score_conflict = false;
        self.store().update_match(m)?;

        self.notify_both_captains(
            m,
            NotificationKind::ScoreNull,
            "Scores could not be reconciled; the match is recorded without a result",
        )?;
        Ok(ScoreOutcome::NullResult)
    }

    fn notify_both_captains(
        &self,
        m: &Match,
        kind: NotificationKind,
        message: &str,
    ) -> Result<()> {
        for side in [TeamSide::A, TeamSide::B] {
            let captain = self.captain_of_side(m, side)?;
            self.notify(&captain, kind, NotificationPayload::for_match(&m.id).with_message(message));
        }
        Ok(())
    }
}

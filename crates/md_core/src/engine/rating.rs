//! Peer ratings under the anti-inflation budget.
//!
//! After a confirmed result, each participant may rate opponents (never
//! teammates) 1-10. One submission per rater per match, and the submission's
//! total may not exceed `opponent_count * 7`: generous scores are possible,
//! a uniform wall of 10s is not.

use std::collections::HashSet;

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{
    JoinStatus, MatchStatus, Rating, RatingEntry, TeamSide, MAX_RATING_TARGETS,
    RATING_BUDGET_PER_OPPONENT,
};

impl Engine {
    /// Submit the caller's ratings for opponents in a completed match.
    /// Returns the number of persisted rating rows.
    ///
    /// Validation order: value range per item, then the teammate rule, then
    /// the budget. Nothing persists unless every item passes.
    pub fn submit_ratings(
        &self,
        caller_id: &str,
        match_id: &str,
        entries: &[RatingEntry],
    ) -> Result<usize> {
        let m = self.must_match(match_id)?;
        if m.status != MatchStatus::Completed {
            return Err(EngineError::WrongStatus { found: m.status });
        }

        if entries.len() > MAX_RATING_TARGETS {
            return Err(EngineError::TooManyRatingTargets {
                count: entries.len(),
                max: MAX_RATING_TARGETS,
            });
        }
        for entry in entries {
            if !(1..=10).contains(&entry.value) {
                return Err(EngineError::InvalidRatingValue { value: entry.value });
            }
        }
        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.rated_id.as_str()) {
                return Err(EngineError::DuplicateRatingTarget {
                    player_id: entry.rated_id.clone(),
                });
            }
        }

        let rows = self.store().match_players_for_match(match_id)?;
        let rater_side = rows
            .iter()
            .find(|row| row.player_id == caller_id && row.join_status == JoinStatus::Approved)
            .map(|row| row.team_side)
            .ok_or_else(|| EngineError::NotParticipant { player_id: caller_id.to_string() })?;

        let opponents: HashSet<&str> = rows
            .iter()
            .filter(|row| {
                row.join_status == JoinStatus::Approved && row.team_side == rater_side.opposite()
            })
            .map(|row| row.player_id.as_str())
            .collect();
        let teammates: HashSet<&str> = rows
            .iter()
            .filter(|row| row.join_status == JoinStatus::Approved && row.team_side == rater_side)
            .map(|row| row.player_id.as_str())
            .collect();

        for entry in entries {
            if opponents.contains(entry.rated_id.as_str()) {
                continue;
            }
            if teammates.contains(entry.rated_id.as_str()) {
                return Err(EngineError::TeammateRating);
            }
            return Err(EngineError::NotParticipant { player_id: entry.rated_id.clone() });
        }

        let total: u32 = entries.iter().map(|e| e.value as u32).sum();
        let budget = opponents.len() as u32 * RATING_BUDGET_PER_OPPONENT;
        if total > budget {
            return Err(EngineError::BudgetExceeded { total, budget });
        }

        let already = self
            .store()
            .ratings_for_match(match_id)?
            .iter()
            .any(|r| r.rater_id == caller_id);
        if already {
            return Err(EngineError::AlreadyRated);
        }

        for entry in entries {
            self.store().insert_rating(Rating::new(match_id, caller_id, entry))?;
        }
        self.update_rated_stats(entries)?;
        Ok(entries.len())
    }

    /// Refresh received-rating aggregates for every rated player.
    fn update_rated_stats(&self, entries: &[RatingEntry]) -> Result<()> {
        for entry in entries {
            let mut player = self.must_player(&entry.rated_id)?;
            player.total_ratings += entry.value as u32;
            player.rating_count += 1;
            self.store().update_player(&player)?;
        }
        Ok(())
    }
}

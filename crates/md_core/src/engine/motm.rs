//! Man-of-the-Match voting.
//!
//! Voting opens when a match completes. Every approved participant gets one
//! vote for an approved participant; the vote that reaches quorum (one per
//! participant) finalizes the winner in the same call.
//!
//! Tie-break: most votes wins; level candidates are ordered by earliest
//! recorded vote, then lexicographic player id. Deterministic for any store
//! that assigns monotonic insertion sequences.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{
    JoinStatus, MotmVote, NotificationKind, NotificationPayload,
};

/// Season-point bonus for the match's MOTM
pub const MOTM_BONUS_POINTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Vote recorded; quorum not yet reached
    Recorded { votes: usize, total_voters: usize },
    /// This vote reached quorum and the winner was finalized
    Finalized { winner_id: String },
}

impl Engine {
    /// Cast the caller's MOTM vote. The quorum-reaching vote tallies,
    /// awards the bonus, closes voting, and notifies every participant.
    pub fn vote(
        &self,
        caller_id: &str,
        match_id: &str,
        voted_player_id: &str,
    ) -> Result<VoteOutcome> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut m = self.must_match(match_id)?;
        if !m.motm_voting_open {
            return Err(EngineError::VotingClosed);
        }

        let participants: Vec<String> = self
            .store()
            .match_players_for_match(match_id)?
            .into_iter()
            .filter(|row| row.join_status == JoinStatus::Approved)
            .map(|row| row.player_id)
            .collect();
        let participant_set: HashSet<&str> =
            participants.iter().map(String::as_str).collect();

        if !participant_set.contains(caller_id) {
            return Err(EngineError::NotParticipant { player_id: caller_id.to_string() });
        }
        if !participant_set.contains(voted_player_id) {
            return Err(EngineError::NotParticipant {
                player_id: voted_player_id.to_string(),
            });
        }

        let votes = self.store().votes_for_match(match_id)?;
        if votes.iter().any(|v| v.voter_id == caller_id) {
            return Err(EngineError::AlreadyVoted);
        }

        let vote = self
            .store()
            .insert_vote(MotmVote::new(match_id, caller_id, voted_player_id))?;

        let total_voters = participants.len();
        let cast = votes.len() + 1;
        if cast < total_voters {
            return Ok(VoteOutcome::Recorded { votes: cast, total_voters });
        }

        // Quorum: every approved participant has voted
        let mut all_votes = votes;
        all_votes.push(vote);
        let winner_id = tally_winner(&all_votes);

        let mut winner = self.must_player(&winner_id)?;
        winner.motm_count += 1;
        winner.season_points += MOTM_BONUS_POINTS;
        self.store().update_player(&winner)?;

        m.motm_voting_open = false;
        self.store().update_match(&m)?;

        let payload = NotificationPayload::for_match(match_id)
            .with_player(&winner_id)
            .with_message(format!("{} is the Man of the Match", winner.name));
        for participant in &participants {
            self.notify(participant, NotificationKind::MotmWinner, payload.clone());
        }

        log::info!("motm for match {} finalized: {}", match_id, winner_id);
        Ok(VoteOutcome::Finalized { winner_id })
    }
}

/// Most votes wins; ties go to the earliest recorded vote, then to the
/// lexicographically smaller player id.
fn tally_winner(votes: &[MotmVote]) -> String {
    let mut tallies: HashMap<&str, (usize, u64)> = HashMap::new();
    for vote in votes {
        let entry = tallies.entry(vote.voted_player_id.as_str()).or_insert((0, vote.seq));
        entry.0 += 1;
        entry.1 = entry.1.min(vote.seq);
    }

    let mut candidates: Vec<(&str, usize, u64)> =
        tallies.into_iter().map(|(id, (count, first_seq))| (id, count, first_seq)).collect();
    candidates.sort_by(|a, b| {
        b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)).then_with(|| a.0.cmp(b.0))
    });
    candidates[0].0.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{fixture, Fixture};
    use crate::models::{Match, MatchStatus, MatchType, Player, TeamSide};
    use crate::store::MatchStore;

    /// A completed match with `n_a + n_b` approved participants and open
    /// voting.
    fn voting_match(fx: &Fixture, n_a: usize, n_b: usize) -> (Match, Vec<Player>) {
        let (mut m, _ta, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let mut players = fx.approved_players(&m, TeamSide::A, n_a, "Home");
        players.extend(fx.approved_players(&m, TeamSide::B, n_b, "Away"));

        m.status = MatchStatus::Completed;
        m.score_a = Some(1);
        m.score_b = Some(0);
        m.motm_voting_open = true;
        m.points_awarded = true;
        fx.store.update_match(&m).unwrap();
        (m, players)
    }

    #[test]
    fn test_vote_requires_open_voting() {
        let fx = fixture();
        let (m, _ta, _ca, _tb, _cb) = fx.confirmed_match(MatchType::Public, 7);
        let players = fx.approved_players(&m, TeamSide::A, 2, "Home");

        let err = fx.engine.vote(&players[0].id, &m.id, &players[1].id).unwrap_err();
        assert!(matches!(err, EngineError::VotingClosed));
    }

    #[test]
    fn test_vote_rejects_non_participants() {
        let fx = fixture();
        let (m, players) = voting_match(&fx, 2, 2);
        let outsider = fx.player("Outsider");

        let err = fx.engine.vote(&outsider.id, &m.id, &players[0].id).unwrap_err();
        assert!(matches!(err, EngineError::NotParticipant { .. }));

        let err = fx.engine.vote(&players[0].id, &m.id, &outsider.id).unwrap_err();
        assert!(matches!(err, EngineError::NotParticipant { .. }));
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let fx = fixture();
        let (m, players) = voting_match(&fx, 2, 2);

        fx.engine.vote(&players[0].id, &m.id, &players[1].id).unwrap();
        let err = fx.engine.vote(&players[0].id, &m.id, &players[2].id).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyVoted));
    }

    #[test]
    fn test_sixth_vote_finalizes_with_six_participants() {
        let fx = fixture();
        let (m, players) = voting_match(&fx, 3, 3);
        let favourite = &players[0];

        for (i, voter) in players.iter().enumerate().take(5) {
            let target = if voter.id == favourite.id { &players[1] } else { favourite };
            let outcome = fx.engine.vote(&voter.id, &m.id, &target.id).unwrap();
            assert_eq!(
                outcome,
                VoteOutcome::Recorded { votes: i + 1, total_voters: 6 },
                "vote {} must not finalize",
                i + 1
            );
        }

        let outcome = fx.engine.vote(&players[5].id, &m.id, &favourite.id).unwrap();
        assert_eq!(outcome, VoteOutcome::Finalized { winner_id: favourite.id.clone() });

        let stored = fx.reload_match(&m.id);
        assert!(!stored.motm_voting_open, "voting closes on finalization");

        let winner = fx.reload_player(&favourite.id);
        assert_eq!(winner.motm_count, 1);
        assert_eq!(winner.season_points, MOTM_BONUS_POINTS);

        // Every participant hears about the winner
        assert_eq!(fx.sink.count_of_kind(NotificationKind::MotmWinner), 6);

        // Voting closed: a late vote is rejected, finalization ran once
        let err = fx.engine.vote(&players[5].id, &m.id, &favourite.id).unwrap_err();
        assert!(matches!(err, EngineError::VotingClosed));
        assert_eq!(fx.reload_player(&favourite.id).motm_count, 1);
    }

    #[test]
    fn test_tie_breaks_by_earliest_vote() {
        let fx = fixture();
        let (m, players) = voting_match(&fx, 2, 2);
        let (first, second) = (&players[2], &players[3]);

        // 2-2 tie; `first` collected a vote before `second`
        fx.engine.vote(&players[0].id, &m.id, &first.id).unwrap();
        fx.engine.vote(&players[1].id, &m.id, &second.id).unwrap();
        fx.engine.vote(&players[2].id, &m.id, &second.id).unwrap();
        let outcome = fx.engine.vote(&players[3].id, &m.id, &first.id).unwrap();

        assert_eq!(outcome, VoteOutcome::Finalized { winner_id: first.id.clone() });
    }

    #[test]
    fn test_tally_winner_prefers_vote_count() {
        let votes = vec![
            MotmVote { seq: 1, ..MotmVote::new("m", "v1", "alice") },
            MotmVote { seq: 2, ..MotmVote::new("m", "v2", "bob") },
            MotmVote { seq: 3, ..MotmVote::new("m", "v3", "bob") },
        ];
        assert_eq!(tally_winner(&votes), "bob");
    }

    #[test]
    fn test_tally_winner_tie_prefers_earliest_seq_over_id() {
        // Same count; candidate seqs differ, earliest wins regardless of id
        let votes = vec![
            MotmVote { seq: 5, ..MotmVote::new("m", "v1", "zed") },
            MotmVote { seq: 6, ..MotmVote::new("m", "v2", "amy") },
        ];
        assert_eq!(tally_winner(&votes), "zed");
    }
}

//! Thread-safe in-memory store.
//!
//! Backs the engine in tests and in single-process deployments. A single
//! `RwLock` over the table map gives each accessor the per-record atomicity
//! the contract asks for; cross-record windows are serialized by the
//! engine's match lanes, not here.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{MatchStore, StoreError};
use crate::models::{
    JoinStatus, Match, MatchPlayer, MatchRequest, MotmVote, Notification, Player, Rating, Team,
    TeamSide,
};

#[derive(Default)]
struct Tables {
    matches: HashMap<String, Match>,
    teams: HashMap<String, Team>,
    players: HashMap<String, Player>,
    requests: HashMap<String, MatchRequest>,
    match_players: HashMap<String, MatchPlayer>,
    votes: HashMap<String, MotmVote>,
    ratings: HashMap<String, Rating>,
    notifications: HashMap<String, Notification>,
    /// Monotonic insertion sequence for votes (tie-break ordering)
    vote_seq: u64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().expect("store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().expect("store lock poisoned")
    }
}

fn insert_unique<T: Clone>(
    table: &mut HashMap<String, T>,
    entity: &'static str,
    id: &str,
    row: T,
) -> Result<T, StoreError> {
    if table.contains_key(id) {
        return Err(StoreError::Duplicate { entity, id: id.to_string() });
    }
    table.insert(id.to_string(), row.clone());
    Ok(row)
}

fn update_existing<T: Clone>(
    table: &mut HashMap<String, T>,
    entity: &'static str,
    id: &str,
    row: T,
) -> Result<T, StoreError> {
    if !table.contains_key(id) {
        return Err(StoreError::Missing { entity, id: id.to_string() });
    }
    table.insert(id.to_string(), row.clone());
    Ok(row)
}

impl MatchStore for MemoryStore {
    fn insert_match(&self, m: Match) -> Result<Match, StoreError> {
        insert_unique(&mut self.write().matches, "match", &m.id.clone(), m)
    }

    fn match_by_id(&self, id: &str) -> Result<Option<Match>, StoreError> {
        Ok(self.read().matches.get(id).cloned())
    }

    fn update_match(&self, m: &Match) -> Result<Match, StoreError> {
        update_existing(&mut self.write().matches, "match", &m.id, m.clone())
    }

    fn insert_team(&self, team: Team) -> Result<Team, StoreError> {
        insert_unique(&mut self.write().teams, "team", &team.id.clone(), team)
    }

    fn team_by_id(&self, id: &str) -> Result<Option<Team>, StoreError> {
        Ok(self.read().teams.get(id).cloned())
    }

    fn insert_player(&self, player: Player) -> Result<Player, StoreError> {
        insert_unique(&mut self.write().players, "player", &player.id.clone(), player)
    }

    fn player_by_id(&self, id: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.read().players.get(id).cloned())
    }

    fn update_player(&self, player: &Player) -> Result<Player, StoreError> {
        update_existing(&mut self.write().players, "player", &player.id, player.clone())
    }

    fn insert_request(&self, request: MatchRequest) -> Result<MatchRequest, StoreError> {
        insert_unique(&mut self.write().requests, "match_request", &request.id.clone(), request)
    }

    fn request_by_id(&self, id: &str) -> Result<Option<MatchRequest>, StoreError> {
        Ok(self.read().requests.get(id).cloned())
    }

    fn update_request(&self, request: &MatchRequest) -> Result<MatchRequest, StoreError> {
        update_existing(&mut self.write().requests, "match_request", &request.id, request.clone())
    }

    fn requests_for_match(&self, match_id: &str) -> Result<Vec<MatchRequest>, StoreError> {
        let mut rows: Vec<MatchRequest> = self
            .read()
            .requests
            .values()
            .filter(|r| r.match_id == match_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn insert_match_player(&self, row: MatchPlayer) -> Result<MatchPlayer, StoreError> {
        insert_unique(&mut self.write().match_players, "match_player", &row.id.clone(), row)
    }

    fn match_player_by_id(&self, id: &str) -> Result<Option<MatchPlayer>, StoreError> {
        Ok(self.read().match_players.get(id).cloned())
    }

    fn update_match_player(&self, row: &MatchPlayer) -> Result<MatchPlayer, StoreError> {
        update_existing(&mut self.write().match_players, "match_player", &row.id, row.clone())
    }

    fn match_players_for_match(&self, match_id: &str) -> Result<Vec<MatchPlayer>, StoreError> {
        let mut rows: Vec<MatchPlayer> = self
            .read()
            .match_players
            .values()
            .filter(|mp| mp.match_id == match_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn approved_count_by_side(
        &self,
        match_id: &str,
        side: TeamSide,
    ) -> Result<usize, StoreError> {
        Ok(self
            .read()
            .match_players
            .values()
            .filter(|mp| {
                mp.match_id == match_id
                    && mp.team_side == side
                    && mp.join_status == JoinStatus::Approved
            })
            .count())
    }

    fn insert_vote(&self, mut vote: MotmVote) -> Result<MotmVote, StoreError> {
        let mut tables = self.write();
        tables.vote_seq += 1;
        vote.seq = tables.vote_seq;
        insert_unique(&mut tables.votes, "motm_vote", &vote.id.clone(), vote)
    }

    fn votes_for_match(&self, match_id: &str) -> Result<Vec<MotmVote>, StoreError> {
        let mut rows: Vec<MotmVote> = self
            .read()
            .votes
            .values()
            .filter(|v| v.match_id == match_id)
            .cloned()
            .collect();
        rows.sort_by_key(|v| v.seq);
        Ok(rows)
    }

    fn insert_rating(&self, rating: Rating) -> Result<Rating, StoreError> {
        insert_unique(&mut self.write().ratings, "rating", &rating.id.clone(), rating)
    }

    fn ratings_for_match(&self, match_id: &str) -> Result<Vec<Rating>, StoreError> {
        let mut rows: Vec<Rating> = self
            .read()
            .ratings
            .values()
            .filter(|r| r.match_id == match_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn insert_notification(&self, n: Notification) -> Result<Notification, StoreError> {
        insert_unique(&mut self.write().notifications, "notification", &n.id.clone(), n)
    }

    fn notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, StoreError> {
        let mut rows: Vec<Notification> = self
            .read()
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }
}

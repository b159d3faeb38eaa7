//! Shared fixtures for engine tests.

use std::sync::Arc;

use crate::engine::Engine;
use crate::models::{
    Match, MatchPlayer, MatchStatus, MatchType, Player, Team, TeamSide,
};
use crate::notify::RecordingSink;
use crate::store::{MatchStore, MemoryStore};

pub(crate) struct Fixture {
    pub engine: Arc<Engine>,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
}

pub(crate) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let engine = Arc::new(Engine::new(store.clone(), sink.clone()));
    Fixture { engine, store, sink }
}

impl Fixture {
    pub fn player(&self, name: &str) -> Player {
        let player = Player::new(name);
        self.store.insert_player(player.clone()).unwrap();
        player
    }

    pub fn team(&self, name: &str, captain: &Player) -> Team {
        let team = Team::new(name, &captain.id);
        self.store.insert_team(team.clone()).unwrap();
        team
    }

    pub fn team_with_captain(&self, name: &str) -> (Team, Player) {
        let captain = self.player(&format!("{} captain", name));
        (self.team(name, &captain), captain)
    }

    pub fn pending_match(&self, match_type: MatchType, team_a: &Team, capacity: u8) -> Match {
        let m = Match::new(match_type, &team_a.id, &team_a.captain_id, capacity, None);
        self.store.insert_match(m.clone()).unwrap();
        m
    }

    /// Bind an opponent directly in the store, skipping negotiation.
    pub fn bind_opponent(&self, m: &mut Match, team_b: &Team) {
        m.team_b_id = Some(team_b.id.clone());
        m.status = MatchStatus::Confirmed;
        self.store.update_match(m).unwrap();
    }

    /// A confirmed match between two fresh teams; returns both captains.
    pub fn confirmed_match(
        &self,
        match_type: MatchType,
        capacity: u8,
    ) -> (Match, Team, Player, Team, Player) {
        let (team_a, captain_a) = self.team_with_captain("Rovers");
        let (team_b, captain_b) = self.team_with_captain("Wanderers");
        let mut m = self.pending_match(match_type, &team_a, capacity);
        self.bind_opponent(&mut m, &team_b);
        (m, team_a, captain_a, team_b, captain_b)
    }

    /// Insert an approved roster row for an existing player.
    pub fn approve_row(&self, m: &Match, player: &Player, side: TeamSide) -> MatchPlayer {
        let row = MatchPlayer::approved(&m.id, &player.id, side);
        self.store.insert_match_player(row.clone()).unwrap();
        row
    }

    /// Seed `n` fresh approved players onto one side.
    pub fn approved_players(
        &self,
        m: &Match,
        side: TeamSide,
        n: usize,
        prefix: &str,
    ) -> Vec<Player> {
        (0..n)
            .map(|i| {
                let player = self.player(&format!("{} {}", prefix, i + 1));
                self.approve_row(m, &player, side);
                player
            })
            .collect()
    }

    pub fn reload_match(&self, id: &str) -> Match {
        self.store.match_by_id(id).unwrap().unwrap()
    }

    pub fn reload_player(&self, id: &str) -> Player {
        self.store.player_by_id(id).unwrap().unwrap()
    }
}

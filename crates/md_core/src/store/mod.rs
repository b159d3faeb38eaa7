//! Entity store contract.
//!
//! The engine treats persistence as an external collaborator reached through
//! typed accessor functions: atomic read-modify-write per record plus
//! equality-filtered range queries. `MemoryStore` is the bundled
//! implementation used by tests and by embeddings that have no external
//! database.

pub mod memory;

use thiserror::Error;

use crate::models::{
    Match, MatchPlayer, MatchRequest, MotmVote, Notification, Player, Rating, Team, TeamSide,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("{entity} not found in store: {id}")]
    Missing { entity: &'static str, id: String },

    #[error("{entity} already exists in store: {id}")]
    Duplicate { entity: &'static str, id: String },
}

/// Typed access to the record store.
///
/// Every method is a single storage round trip; the engine composes them
/// under its per-match serialization lanes. Updates return the post-write
/// row. Implementations must be safe to share across request handlers.
pub trait MatchStore: Send + Sync {
    // ========================
    // Matches
    // ========================
    fn insert_match(&self, m: Match) -> Result<Match, StoreError>;
    fn match_by_id(&self, id: &str) -> Result<Option<Match>, StoreError>;
    fn update_match(&self, m: &Match) -> Result<Match, StoreError>;

    // ========================
    // Teams and players
    // ========================
    fn insert_team(&self, team: Team) -> Result<Team, StoreError>;
    fn team_by_id(&self, id: &str) -> Result<Option<Team>, StoreError>;
    fn insert_player(&self, player: Player) -> Result<Player, StoreError>;
    fn player_by_id(&self, id: &str) -> Result<Option<Player>, StoreError>;
    fn update_player(&self, player: &Player) -> Result<Player, StoreError>;

    // ========================
    // Negotiation requests
    // ========================
    fn insert_request(&self, request: MatchRequest) -> Result<MatchRequest, StoreError>;
    fn request_by_id(&self, id: &str) -> Result<Option<MatchRequest>, StoreError>;
    fn update_request(&self, request: &MatchRequest) -> Result<MatchRequest, StoreError>;
    fn requests_for_match(&self, match_id: &str) -> Result<Vec<MatchRequest>, StoreError>;

    // ========================
    // Roster rows
    // ========================
    fn insert_match_player(&self, row: MatchPlayer) -> Result<MatchPlayer, StoreError>;
    fn match_player_by_id(&self, id: &str) -> Result<Option<MatchPlayer>, StoreError>;
    fn update_match_player(&self, row: &MatchPlayer) -> Result<MatchPlayer, StoreError>;
    fn match_players_for_match(&self, match_id: &str) -> Result<Vec<MatchPlayer>, StoreError>;
    /// Count of `Approved` rows for one side of one match.
    fn approved_count_by_side(&self, match_id: &str, side: TeamSide)
        -> Result<usize, StoreError>;

    // ========================
    // Votes and ratings (append-only)
    // ========================
    fn insert_vote(&self, vote: MotmVote) -> Result<MotmVote, StoreError>;
    fn votes_for_match(&self, match_id: &str) -> Result<Vec<MotmVote>, StoreError>;
    fn insert_rating(&self, rating: Rating) -> Result<Rating, StoreError>;
    fn ratings_for_match(&self, match_id: &str) -> Result<Vec<Rating>, StoreError>;

    // ========================
    // Notifications
    // ========================
    fn insert_notification(&self, n: Notification) -> Result<Notification, StoreError>;
    fn notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, StoreError>;
}

pub use memory::MemoryStore;

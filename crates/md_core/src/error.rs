use thiserror::Error;

use crate::models::{MatchStatus, TeamSide};
use crate::store::StoreError;

/// Engine error taxonomy.
///
/// Validation errors are rejected before any state change. Precondition and
/// state errors carry the same message a sequential caller would get, so a
/// race loser is indistinguishable from a late sequential caller. Storage
/// errors pass through unmodified and fail the current operation only.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("only the team captain may {action}")]
    NotCaptain { action: &'static str },

    #[error("match already has a confirmed opponent")]
    OpponentAlreadyConfirmed,

    #[error("match already has an opponent")]
    OpponentAlreadyBound,

    #[error("team already has a pending invite")]
    PendingInviteExists,

    #[error("request already sent")]
    RequestAlreadySent,

    #[error("cannot request to play against your own team")]
    OwnTeamChallenge,

    #[error("match is not a {expected} match")]
    WrongMatchType { expected: &'static str },

    #[error("match is {found} and does not allow this operation")]
    WrongStatus { found: MatchStatus },

    #[error("request has already been resolved")]
    RequestResolved,

    #[error("max players per team must be at least 1, got {value}")]
    InvalidCapacity { value: u8 },

    #[error("team side {side} is full ({capacity} players)")]
    SideFull { side: TeamSide, capacity: u8 },

    #[error("team is not bound to side {side} of this match")]
    SideNotBound { side: TeamSide },

    #[error("player already has a join request for this match")]
    AlreadyJoined,

    #[error("join request has already been resolved")]
    JoinResolved,

    #[error("voting is not open for this match")]
    VotingClosed,

    #[error("player {player_id} is not an approved participant of this match")]
    NotParticipant { player_id: String },

    #[error("player has already voted in this match")]
    AlreadyVoted,

    #[error("rating value must be between 1 and 10, got {value}")]
    InvalidRatingValue { value: u8 },

    #[error("at most {max} opponents may be rated in one submission, got {count}")]
    TooManyRatingTargets { count: usize, max: usize },

    #[error("duplicate rating target: {player_id}")]
    DuplicateRatingTarget { player_id: String },

    #[error("cannot rate own teammates")]
    TeammateRating,

    #[error("total rating budget exceeded: {total} > {budget}")]
    BudgetExceeded { total: u32, budget: u32 },

    #[error("ratings already submitted for this match")]
    AlreadyRated,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! # md_core - Amateur Football Match Coordination Engine
//!
//! Cooperating state machines that reconcile independent, possibly
//! conflicting actions from two unaffiliated captains (and many players)
//! into a single authoritative match outcome.
//!
//! ## Workflows
//! - Opponent negotiation: friendly invites and public challenges, at most
//!   one opponent ever bound
//! - Roster joins: per-side capacity with captain approval
//! - Score consensus: double submission, one retry, then a null result
//! - MOTM voting: one vote per participant, quorum finalizes
//! - Peer ratings: opponents only, under an anti-inflation budget
//! - Points: 3 / 1 / 0 on a confirmed result, awarded exactly once
//!
//! Persistence and delivery are external: the engine talks to a
//! [`store::MatchStore`] and a [`notify::NotificationSink`], and ships an
//! in-memory store plus a store-backed sink for single-process use.

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;

pub use api::{MatchView, RosterEntry, ScoreStatusView};
pub use engine::lifecycle::CreateMatch;
pub use engine::{Engine, PointsOutcome, ScoreOutcome, VoteOutcome};
pub use error::{EngineError, Result};
pub use models::{
    JoinStatus, Match, MatchPlayer, MatchRequest, MatchStatus, MatchType, MotmVote, Notification,
    NotificationKind, NotificationPayload, Player, Rating, RatingEntry, RequestDirection,
    RequestStatus, ScorePair, Team, TeamSide,
};
pub use notify::{NotificationSink, RecordingSink, StoreSink};
pub use store::{MatchStore, MemoryStore, StoreError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

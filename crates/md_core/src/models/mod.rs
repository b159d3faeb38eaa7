pub mod match_record;
pub mod notification;
pub mod rating;
pub mod request;
pub mod roster;
pub mod team;
pub mod vote;

pub use match_record::{Match, MatchStatus, MatchType, ScorePair};
pub use notification::{Notification, NotificationKind, NotificationPayload};
pub use rating::{Rating, RatingEntry, MAX_RATING_TARGETS, RATING_BUDGET_PER_OPPONENT};
pub use request::{MatchRequest, RequestDirection, RequestStatus};
pub use roster::{JoinStatus, MatchPlayer, TeamSide};
pub use team::{Player, Team};
pub use vote::MotmVote;

pub mod view;

pub use view::{MatchView, RosterEntry, ScoreStatusView};

//! Team and player support entities.
//!
//! The engine consumes these through the store; it never creates teams or
//! players itself apart from mutating the aggregates it owns (season points,
//! MOTM count, received-rating totals).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    /// The player empowered to act for this team (invite, approve joins,
    /// submit scores)
    pub captain_id: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: &str, captain_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            captain_id: captain_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn is_captain(&self, player_id: &str) -> bool {
        self.captain_id == player_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// League points accumulated this season (3 win / 1 draw / +2 MOTM)
    pub season_points: u32,
    pub motm_count: u32,
    /// Sum of rating values received
    pub total_ratings: u32,
    /// Number of ratings received
    pub rating_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            season_points: 0,
            motm_count: 0,
            total_ratings: 0,
            rating_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn average_rating(&self) -> Option<f32> {
        if self.rating_count == 0 {
            None
        } else {
            Some(self.total_ratings as f32 / self.rating_count as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating_empty() {
        let p = Player::new("Ade");
        assert_eq!(p.average_rating(), None);
    }

    #[test]
    fn test_average_rating() {
        let mut p = Player::new("Ade");
        p.total_ratings = 17;
        p.rating_count = 2;
        assert_eq!(p.average_rating(), Some(8.5));
    }
}

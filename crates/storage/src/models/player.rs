use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    pub player_id: Uuid,
    pub name: String,
    pub slug: String,
    pub country: String,
    /// Sum of the player's personal-record scores across all zones.
    pub total: i64,
    pub avg_pos: Option<Decimal>,
    pub avg_percent: Option<Decimal>,
    pub avg_stars: Option<Decimal>,
    pub total_rank: Option<i32>,
    pub avg_pos_rank: Option<i32>,
    pub avg_percent_rank: Option<i32>,
    pub avg_stars_rank: Option<i32>,
    /// XBL-verified totals never decrease, even when the backing scores
    /// are edited or removed.
    pub xbl_total: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// Aggregates recomputed from a player's ranked scores after every
/// mutation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStatistics {
    pub total: i64,
    pub avg_pos: Decimal,
    pub avg_percent: Decimal,
    pub avg_stars: Decimal,
}

/// Global positions across the four leaderboard metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRankings {
    pub total_rank: i32,
    pub avg_pos_rank: i32,
    pub avg_percent_rank: i32,
    pub avg_stars_rank: i32,
}

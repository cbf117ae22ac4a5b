use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{Frequency, GlitchType, Platform, ProofType, Version};

/// One submitted run for a (player, zone) pair.
///
/// `value` is kept as a BIGINT: crash totals overflow 32 bits on the
/// high-payout zones. `percent_wr` and `stars` are derived when the
/// score is written and rewritten whenever the zone's world record
/// moves. `chart_rank` is the instantaneous dense rank among the zone's
/// personal records; `best_rank` is the best rank the entry ever held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Score {
    pub score_id: Uuid,
    pub player_id: Uuid,
    pub zone_id: Uuid,
    pub car_id: Option<Uuid>,
    pub strat_id: Option<Uuid>,
    pub value: i64,
    pub damage: Option<i64>,
    pub multi: Option<i64>,
    pub glitch: GlitchType,
    pub proof_type: Option<ProofType>,
    pub proof_link: Option<String>,
    pub platform: Option<Platform>,
    pub version: Option<Version>,
    pub freq: Option<Frequency>,
    pub emulator: bool,
    pub percent_wr: Option<Decimal>,
    pub stars: Option<i32>,
    /// True while this entry is the player's current personal record.
    pub pr_entry: bool,
    pub chart_rank: Option<i32>,
    pub best_rank: Option<i32>,
    /// Set once the entry reaches rank 1, never cleared.
    pub former_wr: bool,
    pub registration: NaiveDateTime,
    pub realisation: Option<NaiveDate>,
}

impl Score {
    pub fn is_rankable(&self) -> bool {
        self.glitch.is_rankable()
    }
}

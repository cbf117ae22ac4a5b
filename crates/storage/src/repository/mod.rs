mod memory;
mod postgres;

pub use memory::InMemoryScoreRepository;
pub use postgres::PgScoreRepository;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Frequency, GlitchType, Platform, Player, PlayerRankings, PlayerStatistics, ProofType, Score,
    Star, Version, Zone,
};

/// Insert payload for a score row. Derived fields (`percent_wr`,
/// `stars`) are computed by the caller before the insert; ranking
/// fields start unset and are written by the recalculation pass.
#[derive(Debug, Clone)]
pub struct NewScore {
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
    pub percent_wr: Decimal,
    pub stars: i32,
    pub realisation: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub slug: String,
    pub country: String,
    pub xbl_total: bool,
}

#[derive(Debug, Clone)]
pub struct NewZone {
    pub name: String,
    pub slug: String,
    pub has_glitch_modes: bool,
}

#[derive(Debug, Clone)]
pub struct NewStar {
    pub zone_id: Uuid,
    pub nb_stars: i32,
    pub value: i64,
}

/// One row of a zone rank rewrite. A full pass emits an assignment for
/// every score in the zone, ranked or not, so stale ranks cannot
/// survive the rewrite.
#[derive(Debug, Clone)]
pub struct RankAssignment {
    pub score_id: Uuid,
    pub chart_rank: Option<i32>,
    pub best_rank: Option<i32>,
    pub pr_entry: bool,
}

#[derive(Debug, Clone)]
pub struct PercentUpdate {
    pub score_id: Uuid,
    pub percent_wr: Decimal,
}

/// Persistent store consumed by the ranking engine.
///
/// Query methods return snapshots; the engine computes against a
/// snapshot and writes results back through the bulk update methods,
/// which apply atomically per call. Reference data (players, zones,
/// stars) is written by admin workflows and only read during a
/// recalculation pass.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn insert_player(&self, player: NewPlayer) -> Result<Player>;
    async fn insert_zone(&self, zone: NewZone) -> Result<Zone>;
    async fn insert_star(&self, star: NewStar) -> Result<Star>;
    async fn get_player(&self, player_id: Uuid) -> Result<Option<Player>>;
    async fn get_zone(&self, zone_id: Uuid) -> Result<Option<Zone>>;
    async fn list_players(&self) -> Result<Vec<Player>>;
    /// Thresholds for a zone, ascending by score value.
    async fn find_star_thresholds(&self, zone_id: Uuid) -> Result<Vec<Star>>;

    async fn insert_score(&self, score: NewScore) -> Result<Score>;
    async fn get_score(&self, score_id: Uuid) -> Result<Option<Score>>;
    /// Full-row write used by the edit flow.
    async fn save_score(&self, score: &Score) -> Result<()>;
    async fn delete_score(&self, score_id: Uuid) -> Result<()>;

    /// The player's current ranked entry for the zone, if any.
    async fn find_personal_record(&self, player_id: Uuid, zone_id: Uuid)
    -> Result<Option<Score>>;
    /// The zone's rank-1 entry, if any.
    async fn find_world_record(&self, zone_id: Uuid) -> Result<Option<Score>>;
    async fn find_scores_in_zone(&self, zone_id: Uuid) -> Result<Vec<Score>>;
    async fn find_scores_for_player_zone(
        &self,
        player_id: Uuid,
        zone_id: Uuid,
    ) -> Result<Vec<Score>>;
    /// All of the player's ranked entries across zones.
    async fn find_ranked_scores_for_player(&self, player_id: Uuid) -> Result<Vec<Score>>;
    /// Entries that held rank 1 at some point, oldest first.
    async fn find_former_world_records(&self, zone_id: Uuid) -> Result<Vec<Score>>;
    async fn find_top_scores(&self, zone_id: Uuid, limit: i64) -> Result<Vec<Score>>;

    async fn clear_chart_ranks(&self, player_id: Uuid, zone_id: Uuid) -> Result<()>;
    /// Atomic rank rewrite for one zone pass.
    async fn apply_chart_ranks(&self, assignments: &[RankAssignment]) -> Result<()>;
    async fn set_former_wr(&self, score_id: Uuid) -> Result<()>;
    /// Atomic percent-of-WR rewrite, used when a world record moves.
    async fn update_percent_wrs(&self, updates: &[PercentUpdate]) -> Result<()>;
    async fn update_player_statistics(
        &self,
        player_id: Uuid,
        stats: &PlayerStatistics,
    ) -> Result<()>;
    async fn update_player_rankings(&self, player_id: Uuid, ranks: &PlayerRankings)
    -> Result<()>;
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Star threshold for a zone: clearing `value` (strictly) awards the
/// tier. Thresholds are unique per (zone, nb_stars) and strictly
/// increasing by tier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Star {
    pub star_id: Uuid,
    pub zone_id: Uuid,
    pub nb_stars: i32,
    pub value: i64,
}

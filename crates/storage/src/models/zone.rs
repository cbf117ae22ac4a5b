use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Zone {
    pub zone_id: Uuid,
    pub name: String,
    pub slug: String,
    /// Whether the zone has separate glitch charts on the site.
    pub has_glitch_modes: bool,
    pub created_at: chrono::NaiveDateTime,
}

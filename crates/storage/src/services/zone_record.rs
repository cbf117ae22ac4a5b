use uuid::Uuid;

use crate::error::Result;
use crate::models::Score;
use crate::repository::{PercentUpdate, ScoreRepository};

use super::metrics::percent_of_wr;

/// Rewrite `percent_wr` for every score in the zone (ranked or not)
/// against the current world record. A zone with no world record left
/// is a no-op. The rewrite is collected from one snapshot and applied
/// as a single atomic batch.
pub async fn propagate_world_record(repo: &dyn ScoreRepository, zone_id: Uuid) -> Result<()> {
    let Some(wr) = repo.find_world_record(zone_id).await? else {
        return Ok(());
    };
    if wr.value <= 0 {
        return Ok(());
    }

    let scores = repo.find_scores_in_zone(zone_id).await?;
    let updates: Vec<PercentUpdate> = scores
        .iter()
        .map(|score| PercentUpdate {
            score_id: score.score_id,
            percent_wr: percent_of_wr(score.value, wr.value),
        })
        .collect();
    repo.update_percent_wrs(&updates).await?;

    tracing::debug!(
        %zone_id,
        wr_value = wr.value,
        entries = updates.len(),
        "world record propagated"
    );
    Ok(())
}

/// Whether the rank-1 entry changed identity or value across a
/// mutation, which is what forces a zone-wide percent rewrite.
pub fn world_record_changed(before: Option<&Score>, after: Option<&Score>) -> bool {
    match (before, after) {
        (None, None) => false,
        (Some(before), Some(after)) => {
            before.score_id != after.score_id || before.value != after.value
        }
        _ => true,
    }
}

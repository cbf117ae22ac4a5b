use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{Player, PlayerRankings};
use crate::repository::ScoreRepository;

/// Recompute the four global positions for every player from one
/// snapshot. Competition ranking: rank = 1 + players strictly better,
/// so ties share a rank and the next player skips (1, 1, 3).
///
/// Quadratic in the player count, which is fine for a single-game
/// leaderboard; revisit with a sorted pass before pointing this at a
/// larger population.
pub async fn recompute_all_rankings(repo: &dyn ScoreRepository) -> Result<()> {
    let players = repo.list_players().await?;

    for player in &players {
        let ranks = PlayerRankings {
            total_rank: rank_by(&players, |other| other.total > player.total),
            avg_pos_rank: rank_by(&players, |other| {
                avg_pos_or_worst(other) < avg_pos_or_worst(player)
            }),
            avg_percent_rank: rank_by(&players, |other| {
                other.avg_percent.unwrap_or_default() > player.avg_percent.unwrap_or_default()
            }),
            avg_stars_rank: rank_by(&players, |other| {
                other.avg_stars.unwrap_or_default() > player.avg_stars.unwrap_or_default()
            }),
        };
        repo.update_player_rankings(player.player_id, &ranks).await?;
    }

    tracing::debug!(players = players.len(), "global rankings recomputed");
    Ok(())
}

fn rank_by<F>(players: &[Player], better: F) -> i32
where
    F: Fn(&Player) -> bool,
{
    players.iter().filter(|player| better(player)).count() as i32 + 1
}

/// Players with no ranked entry yet sort behind every real average
/// position (the stored default for a fresh player row).
fn avg_pos_or_worst(player: &Player) -> Decimal {
    player.avg_pos.unwrap_or_else(|| Decimal::new(999_999, 3))
}

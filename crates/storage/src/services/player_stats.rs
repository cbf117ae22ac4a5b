use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RankingConfig;
use crate::error::{Result, StorageError};
use crate::models::{Player, PlayerStatistics};
use crate::repository::ScoreRepository;

/// Recompute one player's aggregates from their ranked scores.
///
/// Every divisor is the fixed zone universe, not the player's ranked
/// count: zones without a top entry drag the averages down. `avg_pos`
/// additionally charges a full penalty point per missing top-25 slot.
pub async fn recompute_statistics(
    repo: &dyn ScoreRepository,
    player: &Player,
    config: &RankingConfig,
) -> Result<PlayerStatistics> {
    let ranked = repo.find_ranked_scores_for_player(player.player_id).await?;

    let mut zones = HashSet::new();
    for score in &ranked {
        if !zones.insert(score.zone_id) {
            return Err(StorageError::Consistency(format!(
                "player {} holds more than one ranked score in zone {}",
                player.player_id, score.zone_id
            )));
        }
    }

    let mut total: i64 = ranked.iter().map(|score| score.value).sum();
    if player.xbl_total {
        // XBL-verified totals are floored at the previously stored
        // value and never go down.
        total = total.max(player.total);
    }

    let zone_count = Decimal::from(config.zone_count);
    let cutoff = config.top_rank_cutoff as i32;

    let top_ranks: Vec<i64> = ranked
        .iter()
        .filter_map(|score| score.chart_rank)
        .filter(|rank| *rank < cutoff)
        .map(i64::from)
        .collect();
    let rank_sum: i64 = top_ranks.iter().sum();
    let avg_pos = (Decimal::from(rank_sum) / zone_count + zone_count
        - Decimal::from(top_ranks.len() as u64))
    .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);

    let percent_sum: Decimal = ranked.iter().filter_map(|score| score.percent_wr).sum();
    let avg_percent = (percent_sum / zone_count)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let star_sum: i64 = ranked
        .iter()
        .filter_map(|score| score.stars)
        .map(i64::from)
        .sum();
    let avg_stars = (Decimal::from(star_sum) / zone_count)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    let stats = PlayerStatistics {
        total,
        avg_pos,
        avg_percent,
        avg_stars,
    };
    repo.update_player_statistics(player.player_id, &stats).await?;

    tracing::debug!(
        player = %player.player_id,
        total = stats.total,
        %stats.avg_pos,
        "player statistics recomputed"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::repository::{
        InMemoryScoreRepository, NewPlayer, NewScore, NewZone, RankAssignment,
    };

    async fn player(repo: &InMemoryScoreRepository, xbl_total: bool) -> Player {
        repo.insert_player(NewPlayer {
            name: "Alice".into(),
            slug: "alice".into(),
            country: "FR".into(),
            xbl_total,
        })
        .await
        .unwrap()
    }

    async fn ranked_score(
        repo: &InMemoryScoreRepository,
        player_id: Uuid,
        value: i64,
        percent: &str,
        stars: i32,
        rank: i32,
    ) {
        let zone = repo
            .insert_zone(NewZone {
                name: format!("zone-{rank}"),
                slug: format!("zone-{rank}"),
                has_glitch_modes: false,
            })
            .await
            .unwrap();
        let score = repo
            .insert_score(NewScore {
                player_id,
                zone_id: zone.zone_id,
                car_id: None,
                strat_id: None,
                value,
                damage: None,
                multi: None,
                glitch: crate::models::GlitchType::None,
                proof_type: None,
                proof_link: None,
                platform: None,
                version: None,
                freq: None,
                emulator: false,
                percent_wr: percent.parse().unwrap(),
                stars,
                realisation: None,
            })
            .await
            .unwrap();
        repo.apply_chart_ranks(&[RankAssignment {
            score_id: score.score_id,
            chart_rank: Some(rank),
            best_rank: Some(rank),
            pr_entry: true,
        }])
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn missing_zones_drag_the_average_position_down() {
        let repo = InMemoryScoreRepository::new();
        let player = player(&repo, false).await;
        ranked_score(&repo, player.player_id, 1000, "100.00", 3, 5).await;
        ranked_score(&repo, player.player_id, 800, "80.00", 2, 10).await;

        let stats = recompute_statistics(&repo, &player, &RankingConfig::default())
            .await
            .unwrap();

        // (5 + 10) / 30, plus a full point for each of the 28 other zones.
        assert_eq!(stats.avg_pos, "28.500".parse().unwrap());
        assert_eq!(stats.avg_percent, "6.00".parse().unwrap());
        assert_eq!(stats.avg_stars, "0.2".parse().unwrap());
        assert_eq!(stats.total, 1800);
    }

    #[tokio::test]
    async fn ranks_at_the_cutoff_count_as_missing() {
        let repo = InMemoryScoreRepository::new();
        let player = player(&repo, false).await;
        ranked_score(&repo, player.player_id, 500, "40.00", 0, 26).await;

        let stats = recompute_statistics(&repo, &player, &RankingConfig::default())
            .await
            .unwrap();

        // Rank 26 is outside the top 25, so the position average treats
        // the zone as unplayed while total and percent still count it.
        assert_eq!(stats.avg_pos, "30.000".parse().unwrap());
        assert_eq!(stats.total, 500);
        assert_eq!(stats.avg_percent, "1.33".parse().unwrap());
    }

    #[tokio::test]
    async fn two_ranked_scores_in_one_zone_is_a_consistency_error() {
        let repo = InMemoryScoreRepository::new();
        let player = player(&repo, false).await;
        ranked_score(&repo, player.player_id, 1000, "100.00", 0, 1).await;

        let ranked = repo
            .find_ranked_scores_for_player(player.player_id)
            .await
            .unwrap();
        let zone_id = ranked[0].zone_id;
        let dup = repo
            .insert_score(NewScore {
                player_id: player.player_id,
                zone_id,
                car_id: None,
                strat_id: None,
                value: 900,
                damage: None,
                multi: None,
                glitch: crate::models::GlitchType::None,
                proof_type: None,
                proof_link: None,
                platform: None,
                version: None,
                freq: None,
                emulator: false,
                percent_wr: "90.00".parse().unwrap(),
                stars: 0,
                realisation: None,
            })
            .await
            .unwrap();
        repo.apply_chart_ranks(&[RankAssignment {
            score_id: dup.score_id,
            chart_rank: Some(2),
            best_rank: Some(2),
            pr_entry: true,
        }])
        .await
        .unwrap();

        let err = recompute_statistics(&repo, &player, &RankingConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Consistency(_)));
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Player, PlayerRankings, PlayerStatistics, Score, Star, Zone};

use super::{
    NewPlayer, NewScore, NewStar, NewZone, PercentUpdate, RankAssignment, ScoreRepository,
};

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<Uuid, Player>,
    zones: HashMap<Uuid, Zone>,
    stars: HashMap<Uuid, Star>,
    scores: HashMap<Uuid, Score>,
}

/// In-memory store with the same snapshot/bulk-write semantics as the
/// Postgres implementation. Backs the engine test suite; every bulk
/// write applies under a single write-lock acquisition, so readers see
/// either the pre-pass or post-pass state, never a half-written chart.
#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    tables: RwLock<Tables>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn insert_player(&self, player: NewPlayer) -> Result<Player> {
        let row = Player {
            player_id: Uuid::new_v4(),
            name: player.name,
            slug: player.slug,
            country: player.country,
            total: 0,
            avg_pos: None,
            avg_percent: None,
            avg_stars: None,
            total_rank: None,
            avg_pos_rank: None,
            avg_percent_rank: None,
            avg_stars_rank: None,
            xbl_total: player.xbl_total,
            created_at: Utc::now().naive_utc(),
        };
        let mut tables = self.tables.write().await;
        tables.players.insert(row.player_id, row.clone());
        Ok(row)
    }

    async fn insert_zone(&self, zone: NewZone) -> Result<Zone> {
        let row = Zone {
            zone_id: Uuid::new_v4(),
            name: zone.name,
            slug: zone.slug,
            has_glitch_modes: zone.has_glitch_modes,
            created_at: Utc::now().naive_utc(),
        };
        let mut tables = self.tables.write().await;
        tables.zones.insert(row.zone_id, row.clone());
        Ok(row)
    }

    async fn insert_star(&self, star: NewStar) -> Result<Star> {
        let row = Star {
            star_id: Uuid::new_v4(),
            zone_id: star.zone_id,
            nb_stars: star.nb_stars,
            value: star.value,
        };
        let mut tables = self.tables.write().await;
        tables.stars.insert(row.star_id, row.clone());
        Ok(row)
    }

    async fn get_player(&self, player_id: Uuid) -> Result<Option<Player>> {
        let tables = self.tables.read().await;
        Ok(tables.players.get(&player_id).cloned())
    }

    async fn get_zone(&self, zone_id: Uuid) -> Result<Option<Zone>> {
        let tables = self.tables.read().await;
        Ok(tables.zones.get(&zone_id).cloned())
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let tables = self.tables.read().await;
        Ok(tables.players.values().cloned().collect())
    }

    async fn find_star_thresholds(&self, zone_id: Uuid) -> Result<Vec<Star>> {
        let tables = self.tables.read().await;
        let mut thresholds: Vec<Star> = tables
            .stars
            .values()
            .filter(|star| star.zone_id == zone_id)
            .cloned()
            .collect();
        thresholds.sort_by_key(|star| star.value);
        Ok(thresholds)
    }

    async fn insert_score(&self, score: NewScore) -> Result<Score> {
        let row = Score {
            score_id: Uuid::new_v4(),
            player_id: score.player_id,
            zone_id: score.zone_id,
            car_id: score.car_id,
            strat_id: score.strat_id,
            value: score.value,
            damage: score.damage,
            multi: score.multi,
            glitch: score.glitch,
            proof_type: score.proof_type,
            proof_link: score.proof_link,
            platform: score.platform,
            version: score.version,
            freq: score.freq,
            emulator: score.emulator,
            percent_wr: Some(score.percent_wr),
            stars: Some(score.stars),
            pr_entry: false,
            chart_rank: None,
            best_rank: None,
            former_wr: false,
            registration: Utc::now().naive_utc(),
            realisation: score.realisation,
        };
        let mut tables = self.tables.write().await;
        tables.scores.insert(row.score_id, row.clone());
        Ok(row)
    }

    async fn get_score(&self, score_id: Uuid) -> Result<Option<Score>> {
        let tables = self.tables.read().await;
        Ok(tables.scores.get(&score_id).cloned())
    }

    async fn save_score(&self, score: &Score) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.scores.contains_key(&score.score_id) {
            return Err(StorageError::NotFound);
        }
        tables.scores.insert(score.score_id, score.clone());
        Ok(())
    }

    async fn delete_score(&self, score_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .scores
            .remove(&score_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn find_personal_record(
        &self,
        player_id: Uuid,
        zone_id: Uuid,
    ) -> Result<Option<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .find(|s| {
                s.player_id == player_id && s.zone_id == zone_id && s.chart_rank.is_some()
            })
            .cloned())
    }

    async fn find_world_record(&self, zone_id: Uuid) -> Result<Option<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .find(|s| s.zone_id == zone_id && s.chart_rank == Some(1))
            .cloned())
    }

    async fn find_scores_in_zone(&self, zone_id: Uuid) -> Result<Vec<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .filter(|s| s.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn find_scores_for_player_zone(
        &self,
        player_id: Uuid,
        zone_id: Uuid,
    ) -> Result<Vec<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .filter(|s| s.player_id == player_id && s.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn find_ranked_scores_for_player(&self, player_id: Uuid) -> Result<Vec<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .filter(|s| s.player_id == player_id && s.chart_rank.is_some())
            .cloned()
            .collect())
    }

    async fn find_former_world_records(&self, zone_id: Uuid) -> Result<Vec<Score>> {
        let tables = self.tables.read().await;
        let mut records: Vec<Score> = tables
            .scores
            .values()
            .filter(|s| s.zone_id == zone_id && s.former_wr)
            .cloned()
            .collect();
        records.sort_by_key(|s| s.registration);
        Ok(records)
    }

    async fn find_top_scores(&self, zone_id: Uuid, limit: i64) -> Result<Vec<Score>> {
        let tables = self.tables.read().await;
        let mut ranked: Vec<Score> = tables
            .scores
            .values()
            .filter(|s| s.zone_id == zone_id && s.chart_rank.is_some())
            .cloned()
            .collect();
        ranked.sort_by_key(|s| s.chart_rank);
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }

    async fn clear_chart_ranks(&self, player_id: Uuid, zone_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        for score in tables
            .scores
            .values_mut()
            .filter(|s| s.player_id == player_id && s.zone_id == zone_id)
        {
            score.chart_rank = None;
        }
        Ok(())
    }

    async fn apply_chart_ranks(&self, assignments: &[RankAssignment]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for assignment in assignments {
            let score = tables
                .scores
                .get_mut(&assignment.score_id)
                .ok_or(StorageError::NotFound)?;
            score.chart_rank = assignment.chart_rank;
            score.best_rank = assignment.best_rank;
            score.pr_entry = assignment.pr_entry;
        }
        Ok(())
    }

    async fn set_former_wr(&self, score_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        let score = tables.scores.get_mut(&score_id).ok_or(StorageError::NotFound)?;
        score.former_wr = true;
        Ok(())
    }

    async fn update_percent_wrs(&self, updates: &[PercentUpdate]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for update in updates {
            let score = tables
                .scores
                .get_mut(&update.score_id)
                .ok_or(StorageError::NotFound)?;
            score.percent_wr = Some(update.percent_wr);
        }
        Ok(())
    }

    async fn update_player_statistics(
        &self,
        player_id: Uuid,
        stats: &PlayerStatistics,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let player = tables
            .players
            .get_mut(&player_id)
            .ok_or(StorageError::NotFound)?;
        player.total = stats.total;
        player.avg_pos = Some(stats.avg_pos);
        player.avg_percent = Some(stats.avg_percent);
        player.avg_stars = Some(stats.avg_stars);
        Ok(())
    }

    async fn update_player_rankings(
        &self,
        player_id: Uuid,
        ranks: &PlayerRankings,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let player = tables
            .players
            .get_mut(&player_id)
            .ok_or(StorageError::NotFound)?;
        player.total_rank = Some(ranks.total_rank);
        player.avg_pos_rank = Some(ranks.avg_pos_rank);
        player.avg_percent_rank = Some(ranks.avg_percent_rank);
        player.avg_stars_rank = Some(ranks.avg_stars_rank);
        Ok(())
    }
}

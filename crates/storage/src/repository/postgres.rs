use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Player, PlayerRankings, PlayerStatistics, Score, Star, Zone};

use super::{
    NewPlayer, NewScore, NewStar, NewZone, PercentUpdate, RankAssignment, ScoreRepository,
};

const SCORE_COLUMNS: &str = "score_id, player_id, zone_id, car_id, strat_id, value, damage, \
     multi, glitch, proof_type, proof_link, platform, version, freq, emulator, percent_wr, \
     stars, pr_entry, chart_rank, best_rank, former_wr, registration, realisation";

const PLAYER_COLUMNS: &str = "player_id, name, slug, country, total, avg_pos, avg_percent, \
     avg_stars, total_rank, avg_pos_rank, avg_percent_rank, avg_stars_rank, xbl_total, \
     created_at";

/// Postgres-backed store. Bulk rank and percent rewrites run inside a
/// transaction so concurrent readers never observe a half-updated
/// chart.
pub struct PgScoreRepository {
    pool: PgPool,
}

impl PgScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreRepository for PgScoreRepository {
    async fn insert_player(&self, player: NewPlayer) -> Result<Player> {
        let sql = format!(
            "INSERT INTO players (name, slug, country, xbl_total)
             VALUES ($1, $2, $3, $4)
             RETURNING {PLAYER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Player>(&sql)
            .bind(player.name)
            .bind(player.slug)
            .bind(player.country)
            .bind(player.xbl_total)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_zone(&self, zone: NewZone) -> Result<Zone> {
        let row = sqlx::query_as::<_, Zone>(
            "INSERT INTO zones (name, slug, has_glitch_modes)
             VALUES ($1, $2, $3)
             RETURNING zone_id, name, slug, has_glitch_modes, created_at",
        )
        .bind(zone.name)
        .bind(zone.slug)
        .bind(zone.has_glitch_modes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_star(&self, star: NewStar) -> Result<Star> {
        let row = sqlx::query_as::<_, Star>(
            "INSERT INTO stars (zone_id, nb_stars, value)
             VALUES ($1, $2, $3)
             RETURNING star_id, zone_id, nb_stars, value",
        )
        .bind(star.zone_id)
        .bind(star.nb_stars)
        .bind(star.value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_player(&self, player_id: Uuid) -> Result<Option<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE player_id = $1");
        let row = sqlx::query_as::<_, Player>(&sql)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_zone(&self, zone_id: Uuid) -> Result<Option<Zone>> {
        let row = sqlx::query_as::<_, Zone>(
            "SELECT zone_id, name, slug, has_glitch_modes, created_at
             FROM zones WHERE zone_id = $1",
        )
        .bind(zone_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players");
        let rows = sqlx::query_as::<_, Player>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_star_thresholds(&self, zone_id: Uuid) -> Result<Vec<Star>> {
        let rows = sqlx::query_as::<_, Star>(
            "SELECT star_id, zone_id, nb_stars, value
             FROM stars WHERE zone_id = $1 ORDER BY value",
        )
        .bind(zone_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_score(&self, score: NewScore) -> Result<Score> {
        let sql = format!(
            "INSERT INTO scores (player_id, zone_id, car_id, strat_id, value, damage, multi,
                                 glitch, proof_type, proof_link, platform, version, freq,
                                 emulator, percent_wr, stars, realisation)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {SCORE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Score>(&sql)
            .bind(score.player_id)
            .bind(score.zone_id)
            .bind(score.car_id)
            .bind(score.strat_id)
            .bind(score.value)
            .bind(score.damage)
            .bind(score.multi)
            .bind(score.glitch)
            .bind(score.proof_type)
            .bind(score.proof_link)
            .bind(score.platform)
            .bind(score.version)
            .bind(score.freq)
            .bind(score.emulator)
            .bind(score.percent_wr)
            .bind(score.stars)
            .bind(score.realisation)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_score(&self, score_id: Uuid) -> Result<Option<Score>> {
        let sql = format!("SELECT {SCORE_COLUMNS} FROM scores WHERE score_id = $1");
        let row = sqlx::query_as::<_, Score>(&sql)
            .bind(score_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save_score(&self, score: &Score) -> Result<()> {
        let result = sqlx::query(
            "UPDATE scores
             SET car_id = $2, strat_id = $3, value = $4, damage = $5, multi = $6, glitch = $7,
                 proof_type = $8, proof_link = $9, platform = $10, version = $11, freq = $12,
                 emulator = $13, percent_wr = $14, stars = $15, pr_entry = $16,
                 chart_rank = $17, best_rank = $18, former_wr = $19, realisation = $20
             WHERE score_id = $1",
        )
        .bind(score.score_id)
        .bind(score.car_id)
        .bind(score.strat_id)
        .bind(score.value)
        .bind(score.damage)
        .bind(score.multi)
        .bind(score.glitch)
        .bind(score.proof_type)
        .bind(score.proof_link.as_deref())
        .bind(score.platform)
        .bind(score.version)
        .bind(score.freq)
        .bind(score.emulator)
        .bind(score.percent_wr)
        .bind(score.stars)
        .bind(score.pr_entry)
        .bind(score.chart_rank)
        .bind(score.best_rank)
        .bind(score.former_wr)
        .bind(score.realisation)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_score(&self, score_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM scores WHERE score_id = $1")
            .bind(score_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn find_personal_record(
        &self,
        player_id: Uuid,
        zone_id: Uuid,
    ) -> Result<Option<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores
             WHERE player_id = $1 AND zone_id = $2 AND chart_rank IS NOT NULL"
        );
        let row = sqlx::query_as::<_, Score>(&sql)
            .bind(player_id)
            .bind(zone_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_world_record(&self, zone_id: Uuid) -> Result<Option<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE zone_id = $1 AND chart_rank = 1"
        );
        let row = sqlx::query_as::<_, Score>(&sql)
            .bind(zone_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_scores_in_zone(&self, zone_id: Uuid) -> Result<Vec<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE zone_id = $1 ORDER BY value DESC"
        );
        let rows = sqlx::query_as::<_, Score>(&sql)
            .bind(zone_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_scores_for_player_zone(
        &self,
        player_id: Uuid,
        zone_id: Uuid,
    ) -> Result<Vec<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores
             WHERE player_id = $1 AND zone_id = $2 ORDER BY value DESC"
        );
        let rows = sqlx::query_as::<_, Score>(&sql)
            .bind(player_id)
            .bind(zone_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_ranked_scores_for_player(&self, player_id: Uuid) -> Result<Vec<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores
             WHERE player_id = $1 AND chart_rank IS NOT NULL ORDER BY zone_id"
        );
        let rows = sqlx::query_as::<_, Score>(&sql)
            .bind(player_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_former_world_records(&self, zone_id: Uuid) -> Result<Vec<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores
             WHERE zone_id = $1 AND former_wr = TRUE ORDER BY registration"
        );
        let rows = sqlx::query_as::<_, Score>(&sql)
            .bind(zone_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_top_scores(&self, zone_id: Uuid, limit: i64) -> Result<Vec<Score>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM scores
             WHERE zone_id = $1 AND chart_rank IS NOT NULL
             ORDER BY chart_rank LIMIT $2"
        );
        let rows = sqlx::query_as::<_, Score>(&sql)
            .bind(zone_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn clear_chart_ranks(&self, player_id: Uuid, zone_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE scores SET chart_rank = NULL WHERE player_id = $1 AND zone_id = $2")
            .bind(player_id)
            .bind(zone_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn apply_chart_ranks(&self, assignments: &[RankAssignment]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for assignment in assignments {
            sqlx::query(
                "UPDATE scores SET chart_rank = $2, best_rank = $3, pr_entry = $4
                 WHERE score_id = $1",
            )
            .bind(assignment.score_id)
            .bind(assignment.chart_rank)
            .bind(assignment.best_rank)
            .bind(assignment.pr_entry)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn set_former_wr(&self, score_id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE scores SET former_wr = TRUE WHERE score_id = $1")
            .bind(score_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_percent_wrs(&self, updates: &[PercentUpdate]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for update in updates {
            sqlx::query("UPDATE scores SET percent_wr = $2 WHERE score_id = $1")
                .bind(update.score_id)
                .bind(update.percent_wr)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_player_statistics(
        &self,
        player_id: Uuid,
        stats: &PlayerStatistics,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE players
             SET total = $2, avg_pos = $3, avg_percent = $4, avg_stars = $5
             WHERE player_id = $1",
        )
        .bind(player_id)
        .bind(stats.total)
        .bind(stats.avg_pos)
        .bind(stats.avg_percent)
        .bind(stats.avg_stars)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_player_rankings(
        &self,
        player_id: Uuid,
        ranks: &PlayerRankings,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE players
             SET total_rank = $2, avg_pos_rank = $3, avg_percent_rank = $4, avg_stars_rank = $5
             WHERE player_id = $1",
        )
        .bind(player_id)
        .bind(ranks.total_rank)
        .bind(ranks.avg_pos_rank)
        .bind(ranks.avg_percent_rank)
        .bind(ranks.avg_stars_rank)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

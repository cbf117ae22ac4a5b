use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::config::RankingConfig;
use crate::dto::{SubmitScoreRequest, UpdateScoreRequest};
use crate::error::{Result, StorageError};
use crate::models::Score;
use crate::repository::{NewScore, ScoreRepository};

use super::global_ranking::recompute_all_rankings;
use super::metrics::compute_metrics;
use super::personal_record::{is_personal_record, recompute_zone_ranks};
use super::player_stats::recompute_statistics;
use super::zone_record::{propagate_world_record, world_record_changed};

/// Single-writer recalculation engine.
///
/// Every mutation (add, edit, delete) runs one complete pass under the
/// global lock: metrics, personal-record and zone-rank recompute,
/// world-record propagation when the rank-1 entry moved, then the
/// affected player's aggregates and the global rankings. Global
/// rankings read every player row, so passes must not interleave.
pub struct ScoreRankingEngine {
    repo: Arc<dyn ScoreRepository>,
    config: RankingConfig,
    recalc_lock: Mutex<()>,
}

impl ScoreRankingEngine {
    pub fn new(repo: Arc<dyn ScoreRepository>, config: RankingConfig) -> Self {
        Self {
            repo,
            config,
            recalc_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Add a new score and rerun the ranking pipeline.
    pub async fn submit_score(&self, request: SubmitScoreRequest) -> Result<Score> {
        request.validate()?;

        // Input rows are read under the lock: a snapshot taken outside
        // it could race another pass and feed the pipeline stale state.
        let _guard = self.recalc_lock.lock().await;

        let player = self
            .repo
            .get_player(request.player_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        let zone = self
            .repo
            .get_zone(request.zone_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let previous_wr = self.repo.find_world_record(zone.zone_id).await?;
        let thresholds = self.repo.find_star_thresholds(zone.zone_id).await?;
        let metrics = compute_metrics(
            request.value,
            previous_wr.as_ref().map(|wr| wr.value),
            &thresholds,
        );

        let score = self
            .repo
            .insert_score(NewScore {
                player_id: request.player_id,
                zone_id: request.zone_id,
                car_id: request.car_id,
                strat_id: request.strat_id,
                value: request.value,
                damage: request.damage,
                multi: request.multi,
                glitch: request.glitch,
                proof_type: request.proof_type,
                proof_link: request.proof_link,
                platform: request.platform,
                version: request.version,
                freq: request.freq,
                emulator: request.emulator,
                percent_wr: metrics.percent_wr,
                stars: metrics.stars,
                realisation: request.realisation,
            })
            .await?;

        let peers = self
            .repo
            .find_scores_for_player_zone(score.player_id, score.zone_id)
            .await?;
        if is_personal_record(&score, &peers) {
            let outcome = recompute_zone_ranks(self.repo.as_ref(), zone.zone_id).await?;
            if world_record_changed(previous_wr.as_ref(), outcome.world_record.as_ref()) {
                propagate_world_record(self.repo.as_ref(), zone.zone_id).await?;
            }
        }

        recompute_statistics(self.repo.as_ref(), &player, &self.config).await?;
        recompute_all_rankings(self.repo.as_ref()).await?;

        tracing::info!(
            score_id = %score.score_id,
            player = %player.slug,
            zone = %zone.slug,
            value = score.value,
            "score submitted"
        );

        self.repo
            .get_score(score.score_id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Edit an existing score. Metrics always refresh; the ranking
    /// pipeline only reruns when the value changed or the glitch edit
    /// flipped rankability.
    pub async fn update_score(
        &self,
        score_id: Uuid,
        request: UpdateScoreRequest,
    ) -> Result<Score> {
        request.validate()?;

        let _guard = self.recalc_lock.lock().await;

        let mut score = self
            .repo
            .get_score(score_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        let player = self
            .repo
            .get_player(score.player_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let old_value = score.value;
        let old_rankable = score.is_rankable();
        let previous_wr = self.repo.find_world_record(score.zone_id).await?;

        apply_update(&mut score, request);
        let affects_ranking =
            score.value != old_value || score.is_rankable() != old_rankable;

        let thresholds = self.repo.find_star_thresholds(score.zone_id).await?;
        let metrics = compute_metrics(
            score.value,
            previous_wr.as_ref().map(|wr| wr.value),
            &thresholds,
        );
        score.percent_wr = Some(metrics.percent_wr);
        score.stars = Some(metrics.stars);
        self.repo.save_score(&score).await?;

        if affects_ranking {
            self.repo
                .clear_chart_ranks(score.player_id, score.zone_id)
                .await?;
            let outcome = recompute_zone_ranks(self.repo.as_ref(), score.zone_id).await?;
            if world_record_changed(previous_wr.as_ref(), outcome.world_record.as_ref()) {
                propagate_world_record(self.repo.as_ref(), score.zone_id).await?;
            }
            recompute_statistics(self.repo.as_ref(), &player, &self.config).await?;
            recompute_all_rankings(self.repo.as_ref()).await?;
        }

        tracing::info!(%score_id, affects_ranking, "score updated");

        self.repo
            .get_score(score_id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Remove a score. Deleting an unranked entry changes nothing
    /// derived; deleting a ranked one reruns the pipeline for its
    /// (player, zone).
    pub async fn delete_score(&self, score_id: Uuid) -> Result<()> {
        let _guard = self.recalc_lock.lock().await;

        let score = self
            .repo
            .get_score(score_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        let player = self
            .repo
            .get_player(score.player_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let was_ranked = score.chart_rank.is_some();
        let previous_wr = self.repo.find_world_record(score.zone_id).await?;

        self.repo.delete_score(score_id).await?;

        if was_ranked {
            self.repo
                .clear_chart_ranks(score.player_id, score.zone_id)
                .await?;
            let outcome = recompute_zone_ranks(self.repo.as_ref(), score.zone_id).await?;
            if world_record_changed(previous_wr.as_ref(), outcome.world_record.as_ref()) {
                propagate_world_record(self.repo.as_ref(), score.zone_id).await?;
            }
            recompute_statistics(self.repo.as_ref(), &player, &self.config).await?;
            recompute_all_rankings(self.repo.as_ref()).await?;
        }

        tracing::info!(%score_id, was_ranked, "score deleted");
        Ok(())
    }

    /// Full repair pass for one zone: rebuild the chart, repropagate
    /// the world record, refresh every affected player's aggregates and
    /// the global rankings. Idempotent; used after fixture imports and
    /// manual data fixes.
    pub async fn recalculate_zone(&self, zone_id: Uuid) -> Result<()> {
        let _guard = self.recalc_lock.lock().await;

        let zone = self
            .repo
            .get_zone(zone_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        recompute_zone_ranks(self.repo.as_ref(), zone.zone_id).await?;
        propagate_world_record(self.repo.as_ref(), zone.zone_id).await?;

        let scores = self.repo.find_scores_in_zone(zone.zone_id).await?;
        let player_ids: HashSet<Uuid> = scores.iter().map(|score| score.player_id).collect();
        for player_id in player_ids {
            let player = self
                .repo
                .get_player(player_id)
                .await?
                .ok_or(StorageError::NotFound)?;
            recompute_statistics(self.repo.as_ref(), &player, &self.config).await?;
        }
        recompute_all_rankings(self.repo.as_ref()).await?;

        tracing::info!(zone = %zone.slug, "zone recalculated");
        Ok(())
    }
}

fn apply_update(score: &mut Score, request: UpdateScoreRequest) {
    if let Some(value) = request.value {
        score.value = value;
    }
    if let Some(damage) = request.damage {
        score.damage = Some(damage);
    }
    if let Some(multi) = request.multi {
        score.multi = Some(multi);
    }
    if let Some(glitch) = request.glitch {
        score.glitch = glitch;
    }
    if let Some(proof_type) = request.proof_type {
        score.proof_type = Some(proof_type);
    }
    if let Some(proof_link) = request.proof_link {
        score.proof_link = Some(proof_link);
    }
    if let Some(platform) = request.platform {
        score.platform = Some(platform);
    }
    if let Some(version) = request.version {
        score.version = Some(version);
    }
    if let Some(freq) = request.freq {
        score.freq = Some(freq);
    }
    if let Some(emulator) = request.emulator {
        score.emulator = emulator;
    }
    if let Some(car_id) = request.car_id {
        score.car_id = Some(car_id);
    }
    if let Some(strat_id) = request.strat_id {
        score.strat_id = Some(strat_id);
    }
    if let Some(realisation) = request.realisation {
        score.realisation = Some(realisation);
    }
}

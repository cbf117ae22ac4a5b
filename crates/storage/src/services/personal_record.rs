use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Score;
use crate::repository::{RankAssignment, ScoreRepository};

/// Result of a full zone rank pass: the entry now holding rank 1, with
/// its post-pass fields.
#[derive(Debug, Clone)]
pub struct ZoneRankOutcome {
    pub world_record: Option<Score>,
}

/// Total order for chart placement: higher value first; between equal
/// values the newer entry wins (a score tying the world record takes
/// rank 1), and equal timestamps fall back to the id so the order stays
/// deterministic.
pub fn chart_order(a: &Score, b: &Score) -> Ordering {
    b.value
        .cmp(&a.value)
        .then_with(|| b.registration.cmp(&a.registration))
        .then_with(|| a.score_id.cmp(&b.score_id))
}

/// Whether `candidate` is the player's best rankable score in the zone.
/// `player_zone_scores` is the snapshot of all of that player's scores
/// for the zone, including the candidate. Equal values cannot yield two
/// personal records: the chart order picks a single winner.
pub fn is_personal_record(candidate: &Score, player_zone_scores: &[Score]) -> bool {
    if !candidate.is_rankable() {
        return false;
    }
    player_zone_scores
        .iter()
        .filter(|score| score.is_rankable())
        .min_by(|a, b| chart_order(a, b))
        .is_some_and(|best| best.score_id == candidate.score_id)
}

/// Recompute every chart rank in a zone from a snapshot.
///
/// One personal record per player, ranked densely 1..N by the chart
/// order; every other score in the zone loses its rank. `best_rank` is
/// a high-water mark and only ever improves. The rank-1 entry is
/// flagged as a (former) world record.
///
/// Ranks are always rewritten as a whole: patching single rows is how
/// the old stored procedures grew rank gaps.
pub async fn recompute_zone_ranks(
    repo: &dyn ScoreRepository,
    zone_id: Uuid,
) -> Result<ZoneRankOutcome> {
    let scores = repo.find_scores_in_zone(zone_id).await?;

    verify_single_record_per_player(&scores, zone_id)?;

    // Best rankable score per player under the chart order.
    let mut records: HashMap<Uuid, &Score> = HashMap::new();
    for score in scores.iter().filter(|score| score.is_rankable()) {
        records
            .entry(score.player_id)
            .and_modify(|best| {
                if chart_order(score, best) == Ordering::Less {
                    *best = score;
                }
            })
            .or_insert(score);
    }

    let mut chart: Vec<&Score> = records.into_values().collect();
    chart.sort_by(|a, b| chart_order(a, b));
    let record_ids: HashSet<Uuid> = chart.iter().map(|score| score.score_id).collect();

    let mut assignments = Vec::with_capacity(scores.len());
    for (index, score) in chart.iter().enumerate() {
        let rank = index as i32 + 1;
        let best_rank = score.best_rank.map_or(rank, |previous| previous.min(rank));
        assignments.push(RankAssignment {
            score_id: score.score_id,
            chart_rank: Some(rank),
            best_rank: Some(best_rank),
            pr_entry: true,
        });
    }
    for score in scores.iter().filter(|score| !record_ids.contains(&score.score_id)) {
        assignments.push(RankAssignment {
            score_id: score.score_id,
            chart_rank: None,
            best_rank: score.best_rank,
            pr_entry: false,
        });
    }
    repo.apply_chart_ranks(&assignments).await?;

    let world_record = match chart.first() {
        Some(top) => {
            if !top.former_wr {
                repo.set_former_wr(top.score_id).await?;
            }
            repo.get_score(top.score_id).await?
        }
        None => None,
    };

    tracing::debug!(%zone_id, entries = chart.len(), "zone ranks recomputed");

    Ok(ZoneRankOutcome { world_record })
}

fn verify_single_record_per_player(scores: &[Score], zone_id: Uuid) -> Result<()> {
    let mut ranked_players = HashSet::new();
    for score in scores.iter().filter(|score| score.chart_rank.is_some()) {
        if !ranked_players.insert(score.player_id) {
            return Err(StorageError::Consistency(format!(
                "player {} holds more than one ranked score in zone {zone_id}",
                score.player_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::models::GlitchType;

    fn score(player_id: Uuid, value: i64, day: u32, glitch: GlitchType) -> Score {
        Score {
            score_id: Uuid::new_v4(),
            player_id,
            zone_id: Uuid::new_v4(),
            car_id: None,
            strat_id: None,
            value,
            damage: None,
            multi: None,
            glitch,
            proof_type: None,
            proof_link: None,
            platform: None,
            version: None,
            freq: None,
            emulator: false,
            percent_wr: None,
            stars: None,
            pr_entry: false,
            chart_rank: None,
            best_rank: None,
            former_wr: false,
            registration: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            realisation: None,
        }
    }

    #[test]
    fn higher_value_ranks_first() {
        let player = Uuid::new_v4();
        let low = score(player, 500, 1, GlitchType::None);
        let high = score(player, 900, 2, GlitchType::None);
        assert_eq!(chart_order(&high, &low), Ordering::Less);
    }

    #[test]
    fn newer_entry_wins_value_ties() {
        let player = Uuid::new_v4();
        let old = score(player, 1000, 1, GlitchType::None);
        let new = score(player, 1000, 2, GlitchType::None);
        assert_eq!(chart_order(&new, &old), Ordering::Less);
    }

    #[test]
    fn non_rankable_scores_are_never_personal_records() {
        let player = Uuid::new_v4();
        let sink = score(player, 9000, 1, GlitchType::Sink);
        let freeze = score(player, 9000, 2, GlitchType::Freeze);
        let snapshot = vec![sink.clone(), freeze.clone()];
        assert!(!is_personal_record(&sink, &snapshot));
        assert!(!is_personal_record(&freeze, &snapshot));
    }

    #[test]
    fn best_rankable_score_beats_higher_sink() {
        let player = Uuid::new_v4();
        let sink = score(player, 9000, 1, GlitchType::Sink);
        let clean = score(player, 700, 2, GlitchType::None);
        let snapshot = vec![sink, clean.clone()];
        assert!(is_personal_record(&clean, &snapshot));
    }

    #[test]
    fn equal_values_yield_a_single_record() {
        let player = Uuid::new_v4();
        let old = score(player, 1000, 1, GlitchType::None);
        let new = score(player, 1000, 2, GlitchType::None);
        let snapshot = vec![old.clone(), new.clone()];
        assert!(is_personal_record(&new, &snapshot));
        assert!(!is_personal_record(&old, &snapshot));
    }
}

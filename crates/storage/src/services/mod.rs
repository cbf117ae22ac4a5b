mod engine;
mod global_ranking;
mod metrics;
mod personal_record;
mod player_stats;
mod zone_record;

pub use engine::ScoreRankingEngine;
pub use global_ranking::recompute_all_rankings;
pub use metrics::{ScoreMetrics, compute_metrics, percent_of_wr};
pub use personal_record::{ZoneRankOutcome, chart_order, is_personal_record, recompute_zone_ranks};
pub use player_stats::recompute_statistics;
pub use zone_record::{propagate_world_record, world_record_changed};

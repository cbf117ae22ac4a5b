use crate::error::{Result, StorageError};

/// Structural constants of the leaderboard.
///
/// The player averages divide by the full zone universe rather than the
/// player's ranked-score count, so a missing chart entry weighs the
/// average down. The values are fixed per game, not derived at runtime.
#[derive(Debug, Clone, Copy)]
pub struct RankingConfig {
    /// Number of zones in the game. Divisor for every player average.
    pub zone_count: u32,
    /// Chart ranks strictly below this value count toward `avg_pos`
    /// (26 means the top 25 positions).
    pub top_rank_cutoff: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            zone_count: 30,
            top_rank_cutoff: 26,
        }
    }
}

impl RankingConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            zone_count: read_var("RANKING_ZONE_COUNT", defaults.zone_count)?,
            top_rank_cutoff: read_var("RANKING_TOP_RANK_CUTOFF", defaults.top_rank_cutoff)?,
        })
    }
}

fn read_var(name: &str, default: u32) -> Result<u32> {
    parse_var(name, std::env::var(name).ok().as_deref(), default)
}

// Zero is rejected along with garbage: both values divide the player
// averages.
fn parse_var(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(StorageError::Config(format!(
            "{name} must be a positive integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let config = RankingConfig::default();
        assert_eq!(config.zone_count, 30);
        assert_eq!(config.top_rank_cutoff, 26);
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let config = RankingConfig::from_env().unwrap();
        assert_eq!(config.zone_count, RankingConfig::default().zone_count);
    }

    #[test]
    fn rejects_zero_and_garbage_overrides() {
        assert!(matches!(
            parse_var("RANKING_ZONE_COUNT", Some("0"), 30),
            Err(StorageError::Config(_))
        ));
        assert!(matches!(
            parse_var("RANKING_ZONE_COUNT", Some("thirty"), 30),
            Err(StorageError::Config(_))
        ));
        assert_eq!(parse_var("RANKING_ZONE_COUNT", Some("12"), 30).unwrap(), 12);
        assert_eq!(parse_var("RANKING_ZONE_COUNT", None, 30).unwrap(), 30);
    }
}

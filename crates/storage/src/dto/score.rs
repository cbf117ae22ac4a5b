use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Frequency, GlitchType, Platform, ProofType, Version};

/// Payload for a new score submission. Validated before any
/// recalculation starts.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    pub player_id: Uuid,
    pub zone_id: Uuid,
    pub car_id: Option<Uuid>,
    pub strat_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub value: i64,
    #[validate(range(min = 0))]
    pub damage: Option<i64>,
    #[validate(range(min = 0))]
    pub multi: Option<i64>,
    #[serde(default)]
    pub glitch: GlitchType,
    pub proof_type: Option<ProofType>,
    #[validate(url)]
    pub proof_link: Option<String>,
    pub platform: Option<Platform>,
    pub version: Option<Version>,
    pub freq: Option<Frequency>,
    #[serde(default)]
    pub emulator: bool,
    pub realisation: Option<NaiveDate>,
}

/// Partial edit of an existing score. Absent fields are left untouched;
/// the ranking pipeline only reruns when the edit changes the value or
/// flips rankability.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScoreRequest {
    #[validate(range(min = 1))]
    pub value: Option<i64>,
    #[validate(range(min = 0))]
    pub damage: Option<i64>,
    #[validate(range(min = 0))]
    pub multi: Option<i64>,
    pub glitch: Option<GlitchType>,
    pub proof_type: Option<ProofType>,
    #[validate(url)]
    pub proof_link: Option<String>,
    pub platform: Option<Platform>,
    pub version: Option<Version>,
    pub freq: Option<Frequency>,
    pub emulator: Option<bool>,
    pub car_id: Option<Uuid>,
    pub strat_id: Option<Uuid>,
    pub realisation: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn request(value: i64) -> SubmitScoreRequest {
        SubmitScoreRequest {
            player_id: Uuid::new_v4(),
            zone_id: Uuid::new_v4(),
            car_id: None,
            strat_id: None,
            value,
            damage: None,
            multi: None,
            glitch: GlitchType::None,
            proof_type: None,
            proof_link: None,
            platform: None,
            version: None,
            freq: None,
            emulator: false,
            realisation: None,
        }
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(request(0).validate().is_err());
        assert!(request(-5).validate().is_err());
        assert!(request(1).validate().is_ok());
    }

    #[test]
    fn rejects_malformed_proof_links() {
        let mut req = request(1000);
        req.proof_link = Some("not a url".into());
        assert!(req.validate().is_err());

        req.proof_link = Some("https://example.com/run.mp4".into());
        assert!(req.validate().is_ok());
    }
}

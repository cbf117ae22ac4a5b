use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Glitch classification of a run. `Sink` and `Freeze` entries are
/// archived for the community pages but never enter the charts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "glitch_type")]
pub enum GlitchType {
    #[default]
    None,
    Glitch,
    Sink,
    Freeze,
}

impl GlitchType {
    pub fn is_rankable(self) -> bool {
        !matches!(self, GlitchType::Sink | GlitchType::Freeze)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "proof_type")]
pub enum ProofType {
    Pic,
    #[sqlx(rename = "XBL")]
    #[serde(rename = "XBL")]
    Xbl,
    Replay,
    Live,
    Freeze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "platform")]
pub enum Platform {
    #[sqlx(rename = "GC")]
    #[serde(rename = "GC")]
    Gc,
    Xbox,
    #[sqlx(rename = "PS2")]
    #[serde(rename = "PS2")]
    Ps2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "game_version")]
pub enum Version {
    #[sqlx(rename = "PAL")]
    #[serde(rename = "PAL")]
    Pal,
    #[sqlx(rename = "NTSC")]
    #[serde(rename = "NTSC")]
    Ntsc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "frequency")]
pub enum Frequency {
    #[sqlx(rename = "50Hz")]
    #[serde(rename = "50Hz")]
    Hz50,
    #[sqlx(rename = "60Hz")]
    #[serde(rename = "60Hz")]
    Hz60,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_and_freeze_are_not_rankable() {
        assert!(GlitchType::None.is_rankable());
        assert!(GlitchType::Glitch.is_rankable());
        assert!(!GlitchType::Sink.is_rankable());
        assert!(!GlitchType::Freeze.is_rankable());
    }
}

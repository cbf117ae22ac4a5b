mod enums;
mod player;
mod score;
mod star;
mod zone;

pub use enums::{Frequency, GlitchType, Platform, ProofType, Version};
pub use player::{Player, PlayerRankings, PlayerStatistics};
pub use score::Score;
pub use star::Star;
pub use zone::Zone;

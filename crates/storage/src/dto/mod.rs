pub mod score;

pub use score::{SubmitScoreRequest, UpdateScoreRequest};

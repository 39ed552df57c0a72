//! The titration decision process: parameters, episode state, observation
//! encoding, reward shaping, and the reset/step environment itself.

mod observation;
mod params;
pub mod reward;
mod state;
mod titration;

pub use observation::{Observation, OBS_DIM, OBS_HIGH, OBS_LOW};
pub use params::TitrationParameters;
pub use reward::{RewardBreakdown, RewardSnapshot};
pub use state::{EpisodePhase, HistoryEntry};
pub use titration::{StepInfo, StepResult, TitrationEnvironment};

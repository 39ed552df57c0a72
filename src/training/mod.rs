//! Training infrastructure: episode runner, rollout trainer with callbacks,
//! metrics collection, and the reliability-based early stop.

pub mod episode;
pub mod metrics;
pub mod reliability;
pub mod trainer;

pub use episode::{run_episode, run_episode_with, EpisodeResult, EpisodeTrace};
pub use metrics::{EpisodeStats, TrainingMetrics};
pub use reliability::{EvaluationRun, ReliabilityConfig, ReliabilityEvaluator};
pub use trainer::{Trainer, TrainerConfig, TrainingCallback, TrainingSummary};

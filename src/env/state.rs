use serde::{Deserialize, Serialize};

use crate::chemistry::Rgb;

/// Lifecycle of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Freshly reset, no step taken yet.
    Ready,
    /// At least one step taken, episode still running.
    Stepping,
    /// Terminated or truncated. Only `reset` is legal.
    Done,
}

/// One recorded point of the titration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub volume_ml: f64,
    pub ph: f64,
    pub color: Rgb,
}

/// Mutable per-episode state, owned by a single environment.
#[derive(Debug, Clone, Default)]
pub(crate) struct EpisodeState {
    pub volume_ml: f64,
    pub step_count: usize,
    pub previous_distance: Option<f64>,
    pub history: Vec<HistoryEntry>,
}

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::training::episode::EpisodeResult;

/// Summary statistics over the most recent episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub episodes: usize,
    pub mean_reward: f64,
    pub std_reward: f64,
    pub min_reward: f64,
    pub max_reward: f64,
    pub mean_length: f64,
    pub mean_final_ph: f64,
}

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    fn last(&self, last_n: usize) -> impl Iterator<Item = &EpisodeResult> {
        let n = self.episode_results.len().min(last_n);
        self.episode_results.iter().rev().take(n)
    }

    /// Reward and length statistics over the last N episodes.
    pub fn stats(&self, last_n: usize) -> EpisodeStats {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return EpisodeStats::default();
        }
        let rewards: Vec<f64> = self.last(n).map(|r| r.total_reward).collect();
        let mean_reward = rewards.iter().sum::<f64>() / n as f64;
        let variance = rewards
            .iter()
            .map(|r| (r - mean_reward).powi(2))
            .sum::<f64>()
            / n as f64;

        EpisodeStats {
            episodes: n,
            mean_reward,
            std_reward: variance.sqrt(),
            min_reward: rewards.iter().copied().fold(f64::INFINITY, f64::min),
            max_reward: rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_length: self.last(n).map(|r| r.length as f64).sum::<f64>() / n as f64,
            mean_final_ph: self.last(n).map(|r| r.final_ph).sum::<f64>() / n as f64,
        }
    }

    /// Fraction of the last N episodes that ended inside the pH band.
    pub fn band_success_rate(&self, last_n: usize, ph_low: f64, ph_high: f64) -> f64 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self.last(n).filter(|r| r.in_band(ph_low, ph_high)).count();
        hits as f64 / n as f64
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

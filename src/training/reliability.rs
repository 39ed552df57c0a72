//! Early stopping driven by how reliably a policy lands in the target pH band.
//!
//! Shaped reward is only a proxy. The evaluator periodically replays a fixed
//! number of deterministic episodes on its own environment and counts how many
//! end with a pH inside `[ph_low, ph_high]`. Training stops once that success
//! rate clears the threshold on `patience` consecutive evaluations.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::Agent;
use crate::env::{TitrationEnvironment, TitrationParameters};
use crate::error::ConfigError;
use crate::training::episode::run_episode;
use crate::training::trainer::TrainingCallback;

/// Reliability evaluator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityConfig {
    /// Evaluate on trainer steps that are a multiple of this.
    pub eval_interval: usize,
    pub n_eval_episodes: usize,
    pub ph_low: f64,
    pub ph_high: f64,
    /// Minimum fraction of in-band episodes for an evaluation to count.
    pub success_threshold: f64,
    /// Consecutive successful evaluations needed to stop training.
    pub patience: usize,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        ReliabilityConfig {
            eval_interval: 50_000,
            n_eval_episodes: 32,
            ph_low: 6.9,
            ph_high: 7.05,
            success_threshold: 0.9,
            patience: 3,
        }
    }
}

impl ReliabilityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eval_interval == 0 {
            return Err(ConfigError::Validation(
                "reliability.eval_interval must be >= 1".into(),
            ));
        }
        if self.n_eval_episodes == 0 {
            return Err(ConfigError::Validation(
                "reliability.n_eval_episodes must be >= 1".into(),
            ));
        }
        if self.patience == 0 {
            return Err(ConfigError::Validation(
                "reliability.patience must be >= 1".into(),
            ));
        }
        if !(self.ph_low.is_finite() && self.ph_high.is_finite()) || self.ph_low > self.ph_high {
            return Err(ConfigError::Validation(
                "reliability.ph_low must be <= reliability.ph_high".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.success_threshold) {
            return Err(ConfigError::Validation(
                "reliability.success_threshold must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Tally of one evaluation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationRun {
    pub episodes: usize,
    pub successes: usize,
}

impl EvaluationRun {
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.successes as f64 / self.episodes as f64
    }
}

/// Decides whether a policy is reliable enough to stop training.
///
/// Owns a dedicated environment that must not be shared with training
/// rollouts. The consecutive-success counter is its only durable state.
pub struct ReliabilityEvaluator {
    config: ReliabilityConfig,
    env: TitrationEnvironment,
    consecutive_successes: usize,
    last_success_rate: Option<f64>,
}

impl ReliabilityEvaluator {
    pub fn new(
        config: ReliabilityConfig,
        params: TitrationParameters,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let env = TitrationEnvironment::new(params)?;
        Ok(ReliabilityEvaluator {
            config,
            env,
            consecutive_successes: 0,
            last_success_rate: None,
        })
    }

    /// Called by the trainer at a fixed cadence. Returns `false` once training
    /// should stop. Calls off the evaluation interval are no-ops.
    pub fn checkpoint(&mut self, step_count: usize, policy: &mut dyn Agent) -> bool {
        if step_count % self.config.eval_interval != 0 {
            return true;
        }

        let run = self.evaluate_policy(policy);
        let success_rate = run.success_rate();
        self.last_success_rate = Some(success_rate);

        info!(
            step = step_count,
            success_rate,
            successes = run.successes,
            episodes = run.episodes,
            threshold = self.config.success_threshold,
            patience = self.config.patience,
            "reliability evaluation"
        );

        if success_rate >= self.config.success_threshold {
            self.consecutive_successes += 1;
        } else {
            self.consecutive_successes = 0;
        }

        if self.consecutive_successes >= self.config.patience {
            info!(
                success_rate,
                ph_low = self.config.ph_low,
                ph_high = self.config.ph_high,
                evaluations = self.consecutive_successes,
                "stable success rate in pH band, stopping training"
            );
            return false;
        }

        true
    }

    /// Play `n_eval_episodes` deterministic episodes and count in-band endings.
    pub fn evaluate_policy(&mut self, policy: &mut dyn Agent) -> EvaluationRun {
        let mut run = EvaluationRun {
            episodes: 0,
            successes: 0,
        };
        for _ in 0..self.config.n_eval_episodes {
            let trace = run_episode(&mut self.env, policy, true);
            run.episodes += 1;
            if trace.result.in_band(self.config.ph_low, self.config.ph_high) {
                run.successes += 1;
            }
        }
        run
    }

    pub fn consecutive_successes(&self) -> usize {
        self.consecutive_successes
    }

    pub fn last_success_rate(&self) -> Option<f64> {
        self.last_success_rate
    }

    pub fn config(&self) -> &ReliabilityConfig {
        &self.config
    }
}

impl TrainingCallback for ReliabilityEvaluator {
    fn on_step(&mut self, num_timesteps: usize, policy: &mut dyn Agent) -> bool {
        self.checkpoint(num_timesteps, policy)
    }
}

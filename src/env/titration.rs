use serde::{Deserialize, Serialize};
use tracing::debug;

use super::observation::{Observation, OBS_HIGH, OBS_LOW};
use super::params::TitrationParameters;
use super::reward::{RewardBreakdown, RewardSnapshot};
use super::state::{EpisodePhase, EpisodeState, HistoryEntry};
use crate::chemistry::{color_from_ph, compute_ph, Rgb};
use crate::error::{ConfigError, StepError};

/// Volume beyond which the episode is force-terminated, as a multiple of
/// the burette capacity.
///
/// Backstop only: additions past the capacity are already refused by
/// `step`, so no action sequence reaches this limit today.
const HARD_LIMIT_FACTOR: f64 = 1.1;

/// Auxiliary information returned alongside every observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// True pH of the solution (hidden from the agent's observation).
    pub ph: f64,
    pub volume_ml: f64,
    pub distance: f64,
    pub step: usize,
    /// Set when the requested addition exceeded the burette capacity.
    pub out_of_titrant: bool,
    pub reward: RewardBreakdown,
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

impl StepResult {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Episodic weak-acid titration.
///
/// The agent adds discrete volumes of strong base and decides when to stop,
/// observing only the indicator color, the volume ratio and the step ratio.
/// Each instance owns its episode state; parallel rollouts need one
/// environment per worker.
#[derive(Debug, Clone)]
pub struct TitrationEnvironment {
    params: TitrationParameters,
    equivalence_volume_ml: f64,
    state: EpisodeState,
    phase: EpisodePhase,
}

impl TitrationEnvironment {
    /// Validate `params` and build an environment that is ready to step.
    pub fn new(params: TitrationParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        let equivalence_volume_ml = params.equivalence_volume_ml();
        let mut env = TitrationEnvironment {
            params,
            equivalence_volume_ml,
            state: EpisodeState::default(),
            phase: EpisodePhase::Ready,
        };
        env.reset();
        Ok(env)
    }

    /// Start a new episode and return its initial observation.
    pub fn reset(&mut self) -> (Observation, StepInfo) {
        self.state = EpisodeState::default();
        self.phase = EpisodePhase::Ready;

        let ph = self.ph_at(0.0);
        let color = self.color_at(ph);
        self.state.history.push(HistoryEntry {
            volume_ml: 0.0,
            ph,
            color,
        });

        let info = StepInfo {
            ph,
            volume_ml: 0.0,
            distance: (ph - self.params.target_ph).abs(),
            step: 0,
            out_of_titrant: false,
            reward: RewardBreakdown::default(),
        };
        (self.observation(color), info)
    }

    /// Apply one action: an index into the addable volumes, or the stop action.
    pub fn step(&mut self, action: usize) -> Result<StepResult, StepError> {
        if self.phase == EpisodePhase::Done {
            return Err(StepError::EpisodeFinished);
        }
        let num_actions = self.params.num_actions();
        if action >= num_actions {
            return Err(StepError::ActionOutOfRange {
                action,
                num_actions,
            });
        }

        self.phase = EpisodePhase::Stepping;
        self.state.step_count += 1;

        let stopped = action == self.params.stop_action();
        if !stopped {
            let candidate = self.state.volume_ml + self.params.addable_volumes_ml[action];
            if candidate > self.params.burette_capacity_ml {
                return Ok(self.refuse_addition(candidate));
            }
            self.state.volume_ml = candidate;
        }

        let volume_ml = self.state.volume_ml;
        let ph = self.ph_at(volume_ml);
        let color = self.color_at(ph);
        self.state.history.push(HistoryEntry {
            volume_ml,
            ph,
            color,
        });

        let distance = (ph - self.params.target_ph).abs();
        let extreme_ph = ph <= 0.0 || ph >= 14.0;
        let over_hard_limit = volume_ml > HARD_LIMIT_FACTOR * self.params.burette_capacity_ml;
        let terminated = stopped || extreme_ph || over_hard_limit;
        let truncated = !terminated && self.state.step_count >= self.params.max_steps;

        if extreme_ph || over_hard_limit {
            debug!(ph, volume_ml, extreme_ph, over_hard_limit, "episode force-terminated");
        }

        let snapshot = RewardSnapshot {
            previous_distance: self.state.previous_distance,
            ph,
            target_ph: self.params.target_ph,
            distance,
            volume_ml,
            equivalence_volume_ml: self.equivalence_volume_ml,
            terminated,
            truncated,
            extreme_ph,
            over_hard_limit,
        };
        let breakdown = RewardBreakdown::shape(&snapshot);
        self.state.previous_distance = Some(distance);

        if terminated || truncated {
            self.phase = EpisodePhase::Done;
        }

        Ok(StepResult {
            observation: self.observation(color),
            reward: breakdown.total(),
            terminated,
            truncated,
            info: StepInfo {
                ph,
                volume_ml,
                distance,
                step: self.state.step_count,
                out_of_titrant: false,
                reward: breakdown,
            },
        })
    }

    /// The burette cannot supply `candidate_ml`: end the episode at the
    /// current volume without recording a new point.
    fn refuse_addition(&mut self, candidate_ml: f64) -> StepResult {
        let volume_ml = self.state.volume_ml;
        let ph = self.ph_at(volume_ml);
        let distance = (ph - self.params.target_ph).abs();
        let breakdown = RewardBreakdown::out_of_titrant(distance);
        self.phase = EpisodePhase::Done;

        debug!(
            candidate_ml,
            capacity_ml = self.params.burette_capacity_ml,
            volume_ml,
            "titrant exhausted"
        );

        StepResult {
            observation: self.observation(self.color_at(ph)),
            reward: breakdown.total(),
            terminated: true,
            truncated: false,
            info: StepInfo {
                ph,
                volume_ml,
                distance,
                step: self.state.step_count,
                out_of_titrant: true,
                reward: breakdown,
            },
        }
    }

    fn ph_at(&self, base_volume_ml: f64) -> f64 {
        compute_ph(
            self.params.acid_volume_ml / 1000.0,
            self.params.acid_concentration,
            base_volume_ml / 1000.0,
            self.params.base_concentration,
            self.params.acid_pka,
        )
    }

    fn color_at(&self, ph: f64) -> Rgb {
        color_from_ph(ph, self.params.indicator_pka, self.params.neutral_band)
    }

    fn observation(&self, color: Rgb) -> Observation {
        Observation::new(
            color,
            self.state.volume_ml / self.equivalence_volume_ml,
            self.state.step_count as f64 / self.params.max_steps as f64,
        )
    }

    pub fn params(&self) -> &TitrationParameters {
        &self.params
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Every (volume, pH, color) point recorded this episode, starting at reset.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    pub fn volume_ml(&self) -> f64 {
        self.state.volume_ml
    }

    pub fn step_count(&self) -> usize {
        self.state.step_count
    }

    pub fn current_ph(&self) -> f64 {
        self.ph_at(self.state.volume_ml)
    }

    pub fn equivalence_volume_ml(&self) -> f64 {
        self.equivalence_volume_ml
    }

    pub fn num_actions(&self) -> usize {
        self.params.num_actions()
    }

    pub fn stop_action(&self) -> usize {
        self.params.stop_action()
    }

    /// Declared `(low, high)` bounds of the observation vector.
    pub fn observation_bounds(&self) -> (Observation, Observation) {
        (Observation(OBS_LOW), Observation(OBS_HIGH))
    }
}

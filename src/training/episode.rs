use serde::{Deserialize, Serialize};

use crate::ai::{Agent, Transition};
use crate::env::TitrationEnvironment;

/// Outcome of a single episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub total_reward: f64,
    pub length: usize,
    /// pH reported by the last step (the reset pH if no step was taken).
    pub final_ph: f64,
    pub final_volume_ml: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub out_of_titrant: bool,
}

impl EpisodeResult {
    /// Whether the episode ended with its pH inside `[ph_low, ph_high]`.
    pub fn in_band(&self, ph_low: f64, ph_high: f64) -> bool {
        (ph_low..=ph_high).contains(&self.final_ph)
    }
}

/// Result of playing a single episode.
pub struct EpisodeTrace {
    pub transitions: Vec<Transition>,
    pub result: EpisodeResult,
}

/// Reset `env` and drive it with `agent` until it terminates or truncates.
///
/// The agent only chooses actions here; it is not updated.
pub fn run_episode(
    env: &mut TitrationEnvironment,
    agent: &mut dyn Agent,
    deterministic: bool,
) -> EpisodeTrace {
    run_episode_with(env, agent, deterministic, |_, _| true)
}

/// Like [`run_episode`], but hands every transition to `on_step` together
/// with the agent. Returning `false` from `on_step` ends the episode after
/// that transition, leaving `terminated` and `truncated` as the environment
/// reported them.
pub fn run_episode_with<F>(
    env: &mut TitrationEnvironment,
    agent: &mut dyn Agent,
    deterministic: bool,
    mut on_step: F,
) -> EpisodeTrace
where
    F: FnMut(&mut dyn Agent, &Transition) -> bool,
{
    let (mut observation, info) = env.reset();
    let mut transitions = Vec::new();
    let mut result = EpisodeResult {
        total_reward: 0.0,
        length: 0,
        final_ph: info.ph,
        final_volume_ml: info.volume_ml,
        terminated: false,
        truncated: false,
        out_of_titrant: false,
    };

    loop {
        let action = agent.predict(&observation, deterministic);
        let step = env.step(action).unwrap_or_else(|e| {
            panic!("{} selected an invalid action: {}", agent.name(), e)
        });

        result.total_reward += step.reward;
        result.length += 1;
        result.final_ph = step.info.ph;
        result.final_volume_ml = step.info.volume_ml;
        result.terminated = step.terminated;
        result.truncated = step.truncated;
        result.out_of_titrant = step.info.out_of_titrant;

        let transition = Transition {
            observation,
            action,
            reward: step.reward,
            next_observation: step.observation,
            terminated: step.terminated,
            truncated: step.truncated,
        };
        let keep_going = on_step(agent, &transition);
        transitions.push(transition);
        observation = step.observation;

        if !keep_going || step.is_done() {
            break;
        }
    }

    EpisodeTrace {
        transitions,
        result,
    }
}

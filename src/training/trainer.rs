use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::Agent;
use crate::env::TitrationEnvironment;
use crate::training::episode::run_episode_with;
use crate::training::metrics::TrainingMetrics;

/// Hook invoked by the trainer after every timestep.
pub trait TrainingCallback {
    /// Return `false` to stop training.
    fn on_step(&mut self, num_timesteps: usize, policy: &mut dyn Agent) -> bool;
}

/// Trainer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub total_timesteps: usize,
    /// Log rollout statistics every this many episodes.
    pub log_interval: usize,
    /// Number of recent episodes the rollout statistics cover.
    pub metrics_window: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            total_timesteps: 10_000_000,
            log_interval: 250,
            metrics_window: 100,
        }
    }
}

/// What a training run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub timesteps: usize,
    pub episodes: usize,
    /// A callback asked to stop before `total_timesteps` was reached.
    pub stopped_early: bool,
}

/// Rollout loop for any [`Agent`]: collects transitions, hands them to the
/// agent's update hook, and consults the callbacks after every timestep.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run the training loop on `env` until the timestep budget is spent or
    /// a callback returns `false`.
    pub fn train(
        &self,
        agent: &mut dyn Agent,
        env: &mut TitrationEnvironment,
        callbacks: &mut [&mut dyn TrainingCallback],
    ) -> (TrainingSummary, TrainingMetrics) {
        let mut metrics = TrainingMetrics::with_capacity(self.config.metrics_window.max(1));
        let total_timesteps = self.config.total_timesteps;
        let mut timesteps = 0;
        let mut stopped_early = false;

        info!(agent = agent.name(), total_timesteps, "starting training");

        while timesteps < total_timesteps && !stopped_early {
            let trace = run_episode_with(env, agent, false, |agent, transition| {
                agent.update(transition);
                timesteps += 1;

                let mut keep_going = true;
                for callback in callbacks.iter_mut() {
                    keep_going &= callback.on_step(timesteps, agent);
                }
                stopped_early = !keep_going;
                keep_going && timesteps < total_timesteps
            });
            metrics.record_episode(trace.result);

            let episodes = metrics.total_episodes();
            if self.config.log_interval > 0 && episodes % self.config.log_interval == 0 {
                let stats = metrics.stats(self.config.metrics_window);
                info!(
                    episodes,
                    timesteps,
                    mean_reward = stats.mean_reward,
                    std_reward = stats.std_reward,
                    mean_length = stats.mean_length,
                    mean_final_ph = stats.mean_final_ph,
                    "rollout"
                );
            }
        }

        let summary = TrainingSummary {
            timesteps,
            episodes: metrics.total_episodes(),
            stopped_early,
        };
        info!(
            timesteps = summary.timesteps,
            episodes = summary.episodes,
            stopped_early = summary.stopped_early,
            "training complete"
        );
        (summary, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{RandomAgent, ScriptedAgent, Transition};
    use crate::env::TitrationParameters;

    /// Counts calls and asks to stop after a fixed number of them.
    struct StopAfter {
        calls: usize,
        limit: usize,
    }

    impl TrainingCallback for StopAfter {
        fn on_step(&mut self, _num_timesteps: usize, _policy: &mut dyn Agent) -> bool {
            self.calls += 1;
            self.calls < self.limit
        }
    }

    /// Records every transition it is shown.
    struct CountingAgent {
        inner: ScriptedAgent,
        updates: usize,
    }

    impl Agent for CountingAgent {
        fn predict(&mut self, observation: &crate::env::Observation, deterministic: bool) -> usize {
            self.inner.predict(observation, deterministic)
        }

        fn name(&self) -> &str {
            "Counting"
        }

        fn update(&mut self, _transition: &Transition) {
            self.updates += 1;
        }
    }

    fn env() -> TitrationEnvironment {
        TitrationEnvironment::new(TitrationParameters::default()).unwrap()
    }

    #[test]
    fn test_runs_until_timestep_budget() {
        let trainer = Trainer::new(TrainerConfig {
            total_timesteps: 100,
            ..Default::default()
        });
        let mut env = env();
        let mut agent = RandomAgent::seeded(env.num_actions(), 11);
        let (summary, metrics) = trainer.train(&mut agent, &mut env, &mut []);
        assert_eq!(summary.timesteps, 100);
        assert!(!summary.stopped_early);
        assert!(summary.episodes >= 1);
        assert_eq!(summary.episodes, metrics.total_episodes());
    }

    #[test]
    fn test_every_transition_reaches_update() {
        let trainer = Trainer::new(TrainerConfig {
            total_timesteps: 30,
            ..Default::default()
        });
        let mut env = env();
        let mut agent = CountingAgent {
            inner: ScriptedAgent::new(vec![5, 5], env.stop_action(), 200),
            updates: 0,
        };
        let (summary, _) = trainer.train(&mut agent, &mut env, &mut []);
        assert_eq!(agent.updates, 30);
        // Three steps per scripted episode.
        assert_eq!(summary.episodes, 10);
    }

    #[test]
    fn test_callback_stops_training() {
        let trainer = Trainer::new(TrainerConfig {
            total_timesteps: 1_000,
            ..Default::default()
        });
        let mut env = env();
        let mut agent = RandomAgent::seeded(env.num_actions(), 5);
        let mut stop = StopAfter { calls: 0, limit: 7 };
        let (summary, _) = trainer.train(&mut agent, &mut env, &mut [&mut stop]);
        assert!(summary.stopped_early);
        assert_eq!(summary.timesteps, 7);
        assert_eq!(stop.calls, 7);
    }
}

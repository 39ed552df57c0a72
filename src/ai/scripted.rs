use super::agent::Agent;
use crate::env::Observation;

/// Replays a fixed action list every episode, then issues stop.
///
/// The position in the script is read back from the observation's step
/// ratio, so the agent carries no per-episode state and can be shared
/// between interleaved episodes (training rollouts and evaluation runs).
pub struct ScriptedAgent {
    actions: Vec<usize>,
    stop_action: usize,
    max_steps: usize,
}

impl ScriptedAgent {
    /// `max_steps` must match the environment's, since it scales the step ratio.
    pub fn new(actions: Vec<usize>, stop_action: usize, max_steps: usize) -> Self {
        assert!(max_steps > 0, "max_steps must be > 0");
        ScriptedAgent {
            actions,
            stop_action,
            max_steps,
        }
    }

    fn position(&self, observation: &Observation) -> usize {
        (f64::from(observation.step_ratio()) * self.max_steps as f64).round() as usize
    }
}

impl Agent for ScriptedAgent {
    fn predict(&mut self, observation: &Observation, _deterministic: bool) -> usize {
        self.actions
            .get(self.position(observation))
            .copied()
            .unwrap_or(self.stop_action)
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{TitrationEnvironment, TitrationParameters};

    #[test]
    fn test_replays_then_stops() {
        let mut env = TitrationEnvironment::new(TitrationParameters::default()).unwrap();
        let mut agent = ScriptedAgent::new(vec![5, 4], env.stop_action(), 200);
        let (mut obs, _) = env.reset();
        let mut taken = Vec::new();
        loop {
            let action = agent.predict(&obs, true);
            taken.push(action);
            let result = env.step(action).unwrap();
            obs = result.observation;
            if result.is_done() {
                break;
            }
        }
        assert_eq!(taken, vec![5, 4, 6]);
    }

    #[test]
    fn test_restarts_on_reset_observation() {
        let mut env = TitrationEnvironment::new(TitrationParameters::default()).unwrap();
        let mut agent = ScriptedAgent::new(vec![3], env.stop_action(), 200);
        for _ in 0..2 {
            let (obs, _) = env.reset();
            assert_eq!(agent.predict(&obs, true), 3);
            let result = env.step(3).unwrap();
            assert_eq!(agent.predict(&result.observation, true), 6);
        }
    }

    #[test]
    fn test_interleaved_episodes_keep_their_place() {
        let params = TitrationParameters::default();
        let mut training = TitrationEnvironment::new(params.clone()).unwrap();
        let mut evaluation = TitrationEnvironment::new(params.clone()).unwrap();
        let mut agent =
            ScriptedAgent::new(vec![0, 1, 2, 3], training.stop_action(), params.max_steps);

        let (mut obs, _) = training.reset();
        let mut taken = Vec::new();
        for _ in 0..2 {
            let action = agent.predict(&obs, true);
            taken.push(action);
            obs = training.step(action).unwrap().observation;
        }

        // A full episode on another environment in the middle of this one.
        let (mut eval_obs, _) = evaluation.reset();
        loop {
            let result = evaluation.step(agent.predict(&eval_obs, true)).unwrap();
            eval_obs = result.observation;
            if result.is_done() {
                break;
            }
        }

        loop {
            let action = agent.predict(&obs, true);
            taken.push(action);
            let result = training.step(action).unwrap();
            obs = result.observation;
            if result.is_done() {
                break;
            }
        }
        assert_eq!(taken, vec![0, 1, 2, 3, 6]);
    }
}

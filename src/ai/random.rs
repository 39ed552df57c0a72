use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;
use crate::env::Observation;

/// An agent that selects uniformly at random from the whole action space,
/// stop included.
pub struct RandomAgent {
    num_actions: usize,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(num_actions: usize) -> Self {
        assert!(num_actions > 0, "action space must not be empty");
        RandomAgent {
            num_actions,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible variant for tests and benchmarks.
    pub fn seeded(num_actions: usize, seed: u64) -> Self {
        assert!(num_actions > 0, "action space must not be empty");
        RandomAgent {
            num_actions,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn predict(&mut self, _observation: &Observation, _deterministic: bool) -> usize {
        self.rng.random_range(0..self.num_actions)
    }

    fn name(&self) -> &str {
        "Random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{TitrationEnvironment, TitrationParameters};

    #[test]
    fn test_random_agent_selects_valid_action() {
        let mut agent = RandomAgent::new(7);
        let obs = Observation([0.0; 5]);
        for _ in 0..100 {
            let action = agent.predict(&obs, false);
            assert!(action < 7, "Action {} is out of range", action);
        }
    }

    #[test]
    fn test_seeded_agents_agree() {
        let obs = Observation([0.0; 5]);
        let mut a = RandomAgent::seeded(7, 42);
        let mut b = RandomAgent::seeded(7, 42);
        for _ in 0..50 {
            assert_eq!(a.predict(&obs, true), b.predict(&obs, true));
        }
    }

    #[test]
    fn test_random_agent_plays_full_episode() {
        let mut env = TitrationEnvironment::new(TitrationParameters::default()).unwrap();
        let mut agent = RandomAgent::seeded(env.num_actions(), 7);
        let (mut obs, _) = env.reset();
        loop {
            let result = env.step(agent.predict(&obs, false)).unwrap();
            obs = result.observation;
            if result.is_done() {
                break;
            }
        }
    }

    #[test]
    fn test_random_agent_name() {
        let agent = RandomAgent::new(7);
        assert_eq!(agent.name(), "Random");
    }
}

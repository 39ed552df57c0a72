use crate::env::Observation;

/// A single step of experience, as handed to a learning agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub action: usize,
    pub reward: f64,
    pub next_observation: Observation,
    pub terminated: bool,
    pub truncated: bool,
}

impl Transition {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Universal interface for every titration policy.
///
/// How an agent learns is its own business: the trainer only feeds it
/// transitions through [`Agent::update`].
pub trait Agent {
    /// Select an action given the current observation.
    /// When `deterministic` is false, the agent may explore.
    fn predict(&mut self, observation: &Observation, deterministic: bool) -> usize;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Learn from one transition. Fixed policies ignore it.
    fn update(&mut self, _transition: &Transition) {}
}

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::env::Observation;

/// Thresholds for [`IndicatorAgent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorAgentConfig {
    /// Below this volume ratio the agent adds the largest volume.
    pub approach_ratio: f32,
    /// Stop once green leads both red and blue by at least this margin.
    pub green_margin: f32,
}

impl Default for IndicatorAgentConfig {
    fn default() -> Self {
        IndicatorAgentConfig {
            approach_ratio: 0.9,
            green_margin: 0.3,
        }
    }
}

/// Baseline titrator that reads the indicator the way a student would:
/// pour quickly until close to equivalence, then add the smallest volume
/// until the solution turns green.
pub struct IndicatorAgent {
    config: IndicatorAgentConfig,
    num_volumes: usize,
}

impl IndicatorAgent {
    /// `num_volumes` is the number of addable volumes; stop is the next index.
    pub fn new(config: IndicatorAgentConfig, num_volumes: usize) -> Self {
        assert!(num_volumes > 0, "need at least one addable volume");
        IndicatorAgent {
            config,
            num_volumes,
        }
    }

    fn looks_neutral(&self, observation: &Observation) -> bool {
        let [r, g, b] = observation.color();
        g - r >= self.config.green_margin && g - b >= self.config.green_margin
    }
}

impl Agent for IndicatorAgent {
    fn predict(&mut self, observation: &Observation, _deterministic: bool) -> usize {
        if self.looks_neutral(observation) {
            self.num_volumes
        } else if observation.volume_ratio() < self.config.approach_ratio {
            self.num_volumes - 1
        } else {
            0
        }
    }

    fn name(&self) -> &str {
        "Indicator"
    }
}

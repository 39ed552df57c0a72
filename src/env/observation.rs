use serde::{Deserialize, Serialize};

use crate::chemistry::Rgb;

/// Length of the observation vector.
pub const OBS_DIM: usize = 5;

/// Declared lower bound of every observation component.
pub const OBS_LOW: [f32; OBS_DIM] = [0.0, 0.0, 0.0, 0.0, 0.0];

/// Declared upper bound of every observation component.
/// The volume ratio may run past equivalence, up to twice the equivalence volume.
pub const OBS_HIGH: [f32; OBS_DIM] = [1.0, 1.0, 1.0, 2.0, 1.0];

/// What the agent sees: indicator color, titrant used relative to the
/// equivalence volume, and elapsed steps relative to the step limit.
///
/// Layout: `[R, G, B, volume_ratio, step_ratio]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub [f32; OBS_DIM]);

impl Observation {
    /// Build an observation, clamping every component to its declared bound.
    pub fn new(color: Rgb, volume_ratio: f64, step_ratio: f64) -> Self {
        let raw = [color.r, color.g, color.b, volume_ratio, step_ratio];
        let mut values = [0.0f32; OBS_DIM];
        for (i, v) in raw.into_iter().enumerate() {
            values[i] = v.clamp(OBS_LOW[i] as f64, OBS_HIGH[i] as f64) as f32;
        }
        Observation(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn color(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn volume_ratio(&self) -> f32 {
        self.0[3]
    }

    pub fn step_ratio(&self) -> f32 {
        self.0[4]
    }
}

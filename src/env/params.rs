use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable description of one titration setup.
///
/// Volumes are in millilitres, concentrations in mol/L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitrationParameters {
    pub acid_volume_ml: f64,
    pub acid_concentration: f64,
    pub base_concentration: f64,
    pub acid_pka: f64,
    pub target_ph: f64,
    pub max_steps: usize,
    /// Addable titrant volumes, strictly ascending. Action `i` adds entry `i`.
    pub addable_volumes_ml: Vec<f64>,
    pub indicator_pka: f64,
    pub neutral_band: f64,
    /// Total titrant available in the burette.
    pub burette_capacity_ml: f64,
}

impl Default for TitrationParameters {
    fn default() -> Self {
        TitrationParameters {
            acid_volume_ml: 50.0,
            acid_concentration: 0.1,
            base_concentration: 0.1,
            acid_pka: 4.76,
            target_ph: 7.0,
            max_steps: 200,
            addable_volumes_ml: vec![0.1, 0.2, 0.5, 1.0, 2.0, 3.0],
            indicator_pka: 7.0,
            neutral_band: 0.15,
            burette_capacity_ml: 50.0,
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "titration.{name} must be finite and > 0 (got {value})"
        )))
    }
}

impl TitrationParameters {
    /// Check every construction-time invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("acid_volume_ml", self.acid_volume_ml)?;
        require_positive("acid_concentration", self.acid_concentration)?;
        require_positive("base_concentration", self.base_concentration)?;
        require_positive("burette_capacity_ml", self.burette_capacity_ml)?;
        require_positive("neutral_band", self.neutral_band)?;

        for (name, value) in [
            ("acid_pka", self.acid_pka),
            ("target_ph", self.target_ph),
            ("indicator_pka", self.indicator_pka),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "titration.{name} must be finite"
                )));
            }
        }

        if self.max_steps == 0 {
            return Err(ConfigError::Validation(
                "titration.max_steps must be > 0".into(),
            ));
        }
        if self.addable_volumes_ml.is_empty() {
            return Err(ConfigError::Validation(
                "titration.addable_volumes_ml must not be empty".into(),
            ));
        }
        for &v in &self.addable_volumes_ml {
            require_positive("addable_volumes_ml[..]", v)?;
        }
        if self
            .addable_volumes_ml
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return Err(ConfigError::Validation(
                "titration.addable_volumes_ml must be strictly ascending".into(),
            ));
        }

        let veq = self.equivalence_volume_ml();
        if !(veq.is_finite() && veq > 0.0) {
            return Err(ConfigError::Validation(format!(
                "equivalence volume must be finite and > 0 (got {veq})"
            )));
        }

        Ok(())
    }

    /// Titrant volume (mL) at which added base equals the initial acid.
    pub fn equivalence_volume_ml(&self) -> f64 {
        self.acid_concentration * self.acid_volume_ml / self.base_concentration
    }

    /// Number of discrete actions: one per addable volume plus stop.
    pub fn num_actions(&self) -> usize {
        self.addable_volumes_ml.len() + 1
    }

    /// Index of the stop action (one past the last volume index).
    pub fn stop_action(&self) -> usize {
        self.addable_volumes_ml.len()
    }
}

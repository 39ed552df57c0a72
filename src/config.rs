use std::path::Path;

use tracing::warn;

use crate::ai::IndicatorAgentConfig;
use crate::env::TitrationParameters;
use crate::error::ConfigError;
use crate::training::{ReliabilityConfig, TrainerConfig};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub titration: TitrationParameters,
    pub reliability: ReliabilityConfig,
    pub training: TrainerConfig,
    pub indicator_agent: IndicatorAgentConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.titration.validate()?;
        self.reliability.validate()?;

        if self.training.total_timesteps == 0 {
            return Err(ConfigError::Validation(
                "training.total_timesteps must be > 0".into(),
            ));
        }
        if self.training.metrics_window == 0 {
            return Err(ConfigError::Validation(
                "training.metrics_window must be > 0".into(),
            ));
        }

        let ratio = self.indicator_agent.approach_ratio;
        if !(0.0..=2.0).contains(&ratio) {
            return Err(ConfigError::Validation(
                "indicator_agent.approach_ratio must be in [0, 2]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.indicator_agent.green_margin) {
            return Err(ConfigError::Validation(
                "indicator_agent.green_margin must be in [0, 1]".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[titration]
acid_pka = 4.2
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.titration.acid_pka - 4.2).abs() < 1e-12);
        // Other fields should be defaults
        assert_eq!(config.titration.max_steps, 200);
        assert_eq!(config.reliability.n_eval_episodes, 32);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_empty_volumes() {
        let mut config = AppConfig::default();
        config.titration.addable_volumes_ml.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_concentration() {
        let mut config = AppConfig::default();
        config.titration.acid_concentration = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_band() {
        let mut config = AppConfig::default();
        config.reliability.ph_low = 7.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timesteps() {
        let mut config = AppConfig::default();
        config.training.total_timesteps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_green_margin() {
        let mut config = AppConfig::default();
        config.indicator_agent.green_margin = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.reliability.patience, 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[titration]
addable_volumes_ml = [0.05, 0.5, 5.0]
burette_capacity_ml = 60.0

[reliability]
patience = 5
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.titration.addable_volumes_ml, vec![0.05, 0.5, 5.0]);
        assert_eq!(config.titration.num_actions(), 4);
        assert_eq!(config.reliability.patience, 5);
        // Others are defaults
        assert!((config.reliability.ph_high - 7.05).abs() < 1e-12);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[titration]\naddable_volumes_ml = []\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbled.toml");
        std::fs::write(&path, "[titration\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}

use std::path::PathBuf;

/// Errors returned by [`TitrationEnvironment::step`](crate::env::TitrationEnvironment::step).
///
/// Both variants are caller bugs: the environment refuses the call instead of
/// clamping, so reward semantics are never silently altered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("action {action} out of range (action space has {num_actions} actions)")]
    ActionOutOfRange { action: usize, num_actions: usize },

    #[error("episode is finished; call reset() before stepping again")]
    EpisodeFinished,
}

/// Errors that can occur when loading configuration or building parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display() {
        let err = StepError::ActionOutOfRange {
            action: 9,
            num_actions: 7,
        };
        assert_eq!(
            err.to_string(),
            "action 9 out of range (action space has 7 actions)"
        );
        assert_eq!(
            StepError::EpisodeFinished.to_string(),
            "episode is finished; call reset() before stepping again"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("titration.base_concentration must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: titration.base_concentration must be > 0"
        );
    }
}

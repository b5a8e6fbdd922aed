use super::{types::Config, ConfigError};
use crate::store::SESSION_TOKEN_KEY;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Snapshot key is non-empty and does not collide with the session token key
/// - Event buffer is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let key = &config.storage.snapshot_key;
    if key.is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.snapshot_key cannot be empty".to_string(),
        ));
    }
    if key == SESSION_TOKEN_KEY {
        return Err(ConfigError::ValidationError(format!(
            "storage.snapshot_key cannot be '{}' (reserved for the session token)",
            SESSION_TOKEN_KEY
        )));
    }

    if config.catalog.event_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.event_buffer cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_snapshot_key_fails() {
        let mut config = Config::default();
        config.storage.snapshot_key = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_session_key_collision_fails() {
        let mut config = Config::default();
        config.storage.snapshot_key = "userToken".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("session token"));
    }

    #[test]
    fn test_validate_zero_event_buffer_fails() {
        let mut config = Config::default();
        config.catalog.event_buffer = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}

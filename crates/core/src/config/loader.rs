use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from `path`, then apply `SHELFKEEPER_*` environment overrides.
///
/// Nested keys use a double underscore, so `SHELFKEEPER_STORAGE__SNAPSHOT_KEY`
/// sets `storage.snapshot_key` and single underscores stay part of the key name.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHELFKEEPER_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Parse configuration from TOML text only. No environment overrides apply.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PersistFailurePolicy, StorageBackend};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_bad_policy() {
        let toml = r#"
[catalog]
on_persist_failure = "sometimes"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[storage]
backend = "memory"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "shelfkeeper.toml",
                r#"
[storage]
backend = "memory"
snapshot_key = "products"

[catalog]
on_persist_failure = "keep_in_memory"
"#,
            )?;
            jail.set_env("SHELFKEEPER_STORAGE__SNAPSHOT_KEY", "catalog");
            jail.set_env("SHELFKEEPER_CATALOG__ON_PERSIST_FAILURE", "rollback");

            let config = load_config(Path::new("shelfkeeper.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.storage.snapshot_key, "catalog");
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(
                config.catalog.on_persist_failure,
                PersistFailurePolicy::Rollback
            );
            Ok(())
        });
    }
}

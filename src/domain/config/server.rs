use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub upload_dir: PathBuf,
    pub port: u16,
    pub max_upload_size: u64,
    pub event_log_path: Option<PathBuf>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            port: DEFAULT_PORT,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            event_log_path: None,
            cors_allowed_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let upload_dir = get("UPLOAD_DIR")
            .map(|dir| normalize_dir(&dir))
            .unwrap_or(defaults.upload_dir);

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                expected: "a valid u16",
                value,
            })?,
            None => defaults.port,
        };

        let max_upload_size = match get("MAX_UPLOAD_SIZE") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "MAX_UPLOAD_SIZE",
                    expected: "a positive byte count",
                    value,
                })?,
            None => defaults.max_upload_size,
        };

        let event_log_path = get("EVENT_LOG_PATH").map(PathBuf::from);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect()
        });

        Ok(Self {
            upload_dir,
            port,
            max_upload_size,
            event_log_path,
            cors_allowed_origins,
        })
    }
}

// Drops trailing separators but keeps a bare root such as `/`.
fn normalize_dir(dir: &str) -> PathBuf {
    let trimmed = dir.trim().trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        PathBuf::from(&dir.trim()[..1])
    } else {
        PathBuf::from(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn upload_dir_trailing_separator_is_normalized() {
        let config = ServerConfig::from_lookup(lookup(&[("UPLOAD_DIR", "./data/files/")])).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("./data/files"));

        let root = ServerConfig::from_lookup(lookup(&[("UPLOAD_DIR", "/")])).unwrap();
        assert_eq!(root.upload_dir, PathBuf::from("/"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("UPLOAD_DIR", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));
    }

    #[test]
    fn zero_upload_size_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("MAX_UPLOAD_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "MAX_UPLOAD_SIZE", .. }));
    }

    #[test]
    fn optional_settings_are_parsed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("MAX_UPLOAD_SIZE", "1024"),
            ("EVENT_LOG_PATH", "/var/log/uploads.log"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(config.max_upload_size, 1024);
        assert_eq!(config.event_log_path, Some(PathBuf::from("/var/log/uploads.log")));
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
    }
}

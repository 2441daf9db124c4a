//! Server configuration loading from file and environment variables.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Debug recording settings.
    #[serde(default)]
    pub recording: RecordingConfig,
}

/// Network configuration for the gRPC listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "buildwatch_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Debug recording of ingestion streams (fixture generation tooling).
///
/// Disabled by default; when disabled, ingestion runs with no recorder
/// attached and behaves identically.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// Whether to record completed streams to disk.
    #[serde(default)]
    pub enabled: bool,

    /// Directory recordings are written into.
    #[serde(default = "default_recording_dir")]
    pub dir: PathBuf,

    /// Label prefix a stream's single configured target must carry for
    /// its recording to be written.
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recording_dir() -> PathBuf {
    PathBuf::from("recordings")
}

fn default_label_prefix() -> String {
    "//fixtures:".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_recording_dir(),
            label_prefix: default_label_prefix(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `BUILDWATCH_HOST` overrides `server.host`
/// - `BUILDWATCH_PORT` overrides `server.port`
/// - `BUILDWATCH_LOG_LEVEL` overrides `logging.level`
/// - `BUILDWATCH_LOG_JSON` overrides `logging.json` (set to "true")
/// - `BUILDWATCH_RECORDING_DIR` overrides `recording.dir` and enables
///   recording
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("BUILDWATCH_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("BUILDWATCH_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("BUILDWATCH_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("BUILDWATCH_LOG_JSON") {
        config.logging.json = json == "true";
    }
    if let Ok(dir) = std::env::var("BUILDWATCH_RECORDING_DIR") {
        config.recording.enabled = true;
        config.recording.dir = PathBuf::from(dir);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config(Some("/definitely/not/here.toml")).expect("should not fail");
        assert_eq!(config.server.port, 8080);
        assert!(!config.recording.enabled);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9999\n").expect("should write config");

        let config = load_config(path.to_str()).expect("should load");
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.recording.label_prefix, "//fixtures:");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = oops").expect("should write config");

        assert!(matches!(load_config(path.to_str()), Err(ConfigError::Parse(_))));
    }
}

//! Configuration management for the Skirmish match server.
//!
//! This module handles loading, validation, and conversion of server
//! configuration from TOML files and command-line arguments.

use match_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Default grace window for serde deserialization
fn default_cycle_grace() -> u64 {
    10
}

/// Default start countdown for serde deserialization
fn default_countdown() -> u64 {
    30
}

fn default_status_interval() -> u64 {
    60
}

/// Application configuration loaded from TOML file.
///
/// Encompasses the engine settings (filesystem layout and round timers)
/// and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Match engine configuration settings
    pub engine: EngineSettings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
}

/// Engine-specific configuration settings.
///
/// Controls where playfield templates, disposable instances, and the
/// rotation list live, plus the round-boundary timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Directory holding one template tree per playfield
    pub playfields_dir: String,
    /// Directory disposable per-round instances are staged under
    pub instances_dir: String,
    /// Newline-delimited rotation list file
    pub rotation_file: String,
    /// Grace window after a round ends, in seconds
    #[serde(default = "default_cycle_grace")]
    pub cycle_grace_secs: u64,
    /// Countdown before play begins, in seconds
    #[serde(default = "default_countdown")]
    pub countdown_secs: u64,
    /// Interval between periodic status reports, in seconds (0 to disable)
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,
}

/// Logging system configuration.
///
/// Controls log output format, levels, and destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings {
                playfields_dir: "playfields".to_string(),
                instances_dir: "instances".to_string(),
                rotation_file: "rotation.txt".to_string(),
                cycle_grace_secs: default_cycle_grace(),
                countdown_secs: default_countdown(),
                status_interval_secs: default_status_interval(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at
    /// the specified path and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration, or an error if loading or
    /// creation failed.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Converts the application configuration to an engine configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            templates_dir: PathBuf::from(&self.engine.playfields_dir),
            instances_dir: PathBuf::from(&self.engine.instances_dir),
            rotation_file: PathBuf::from(&self.engine.rotation_file),
            cycle_grace_secs: self.engine.cycle_grace_secs,
            countdown_secs: self.engine.countdown_secs,
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string
    /// describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        if self.engine.playfields_dir.is_empty() {
            return Err("Playfields directory cannot be empty".to_string());
        }
        if self.engine.instances_dir.is_empty() {
            return Err("Instances directory cannot be empty".to_string());
        }
        if self.engine.rotation_file.is_empty() {
            return Err("Rotation file cannot be empty".to_string());
        }
        if self.engine.playfields_dir == self.engine.instances_dir {
            return Err("Playfields and instances directories must differ".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!("Invalid log level: {}", self.logging.level));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs;

    #[test]
    fn test_validation_valid_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_valid_log_levels() {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];

        for level in &valid_levels {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Level '{}' should be valid", level);
        }
    }

    #[test]
    fn test_validation_rejects_overlapping_directories() {
        let mut config = AppConfig::default();
        config.engine.instances_dir = config.engine.playfields_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_paths() {
        let mut config = AppConfig::default();
        config.engine.rotation_file = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_engine_config_conversion() {
        let mut config = AppConfig::default();
        config.engine.playfields_dir = "/srv/playfields".to_string();
        config.engine.countdown_secs = 15;

        let engine_config = config.to_engine_config();
        assert_eq!(engine_config.templates_dir, PathBuf::from("/srv/playfields"));
        assert_eq!(engine_config.instances_dir, PathBuf::from("instances"));
        assert_eq!(engine_config.countdown_secs, 15);
    }

    #[tokio::test]
    async fn test_load_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.engine.playfields_dir, "playfields");
        assert_eq!(config.engine.countdown_secs, 30);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[engine]
playfields_dir = "maps"
instances_dir = "live"
rotation_file = "rotation.list"
cycle_grace_secs = 5
countdown_secs = 20

[logging]
level = "debug"
json_format = true
"#;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, toml_content).await.unwrap();

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.engine.playfields_dir, "maps");
        assert_eq!(config.engine.instances_dir, "live");
        assert_eq!(config.engine.rotation_file, "rotation.list");
        assert_eq!(config.engine.cycle_grace_secs, 5);
        assert_eq!(config.engine.countdown_secs, 20);
        // Defaulted field not present in the file.
        assert_eq!(config.engine.status_interval_secs, 60);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }
}

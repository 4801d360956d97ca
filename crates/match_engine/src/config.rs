//! Engine configuration types and defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the match engine core.
///
/// Contains the filesystem layout for playfield templates and disposable
/// instances, the rotation list location, and the two round-boundary
/// timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding one read-only template tree per playfield
    pub templates_dir: PathBuf,

    /// Directory the disposable per-round copies are staged under
    pub instances_dir: PathBuf,

    /// Newline-delimited rotation list resource
    pub rotation_file: PathBuf,

    /// Grace window after a round ends, for end-of-round spectacle,
    /// before the next playfield is selected (seconds)
    pub cycle_grace_secs: u64,

    /// Countdown between a round being staged and play beginning (seconds)
    pub countdown_secs: u64,
}

impl EngineConfig {
    /// Grace window as a [`Duration`].
    pub fn cycle_grace(&self) -> Duration {
        Duration::from_secs(self.cycle_grace_secs)
    }

    /// Start countdown as a [`Duration`].
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("playfields"),
            instances_dir: PathBuf::from("instances"),
            rotation_file: PathBuf::from("rotation.txt"),
            cycle_grace_secs: 10,
            countdown_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = EngineConfig::default();
        assert_eq!(config.templates_dir, PathBuf::from("playfields"));
        assert_eq!(config.instances_dir, PathBuf::from("instances"));
        assert_eq!(config.rotation_file, PathBuf::from("rotation.txt"));
        assert_eq!(config.cycle_grace(), Duration::from_secs(10));
        assert_eq!(config.countdown(), Duration::from_secs(30));
    }
}

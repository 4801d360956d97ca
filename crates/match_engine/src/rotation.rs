//! Ordered playlist of playfield names cycled between rounds.
//!
//! The rotation is loaded once at startup from a newline-delimited list
//! resource; a server with no rotation cannot ever start a round, so an
//! unreadable or empty list is a configuration error. The cursor is not
//! persisted: a restart re-reads the same source and starts from the top.

use crate::error::{EngineError, EngineResult};
use std::path::Path;
use tracing::info;

/// Ordered list of playfield names with a wraparound cursor.
#[derive(Debug, Clone)]
pub struct RotationQueue {
    entries: Vec<String>,
    cursor: usize,
}

impl RotationQueue {
    /// Builds a rotation from an in-memory list. Blank entries are
    /// discarded; an empty result is a configuration error.
    pub fn new(entries: Vec<String>) -> EngineResult<Self> {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        if entries.is_empty() {
            return Err(EngineError::Configuration(
                "rotation list is empty".to_string(),
            ));
        }

        Ok(Self { entries, cursor: 0 })
    }

    /// Reads the rotation from a newline-delimited file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the rotation list resource
    ///
    /// # Returns
    ///
    /// The loaded rotation, or a fatal configuration error if the resource
    /// is unreadable or holds no names.
    pub async fn load(path: &Path) -> EngineResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            EngineError::Configuration(format!(
                "cannot read rotation list {}: {e}",
                path.display()
            ))
        })?;

        let rotation = Self::new(content.lines().map(str::to_string).collect())?;
        info!(
            "🔁 Rotation loaded from {}: {} playfield(s)",
            path.display(),
            rotation.len()
        );
        Ok(rotation)
    }

    /// The playfield name at the current cursor.
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Advances the cursor (modulo length) and returns the new current
    /// playfield name.
    pub fn advance(&mut self) -> &str {
        self.cursor = (self.cursor + 1) % self.entries.len();
        self.current()
    }

    /// Number of entries in the rotation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in rotation order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_with_no_repeats() {
        let mut rotation = RotationQueue::new(vec![
            "alpha".to_string(),
            "beta".to_string(),
            "gamma".to_string(),
        ])
        .expect("non-empty rotation");

        assert_eq!(rotation.current(), "alpha");
        assert_eq!(rotation.advance(), "beta");
        assert_eq!(rotation.advance(), "gamma");
        assert_eq!(rotation.advance(), "alpha");
    }

    #[test]
    fn single_entry_rotation_wraps_to_itself() {
        let mut rotation = RotationQueue::new(vec!["solo".to_string()]).unwrap();
        assert_eq!(rotation.advance(), "solo");
        assert_eq!(rotation.advance(), "solo");
    }

    #[test]
    fn blank_lines_are_discarded() {
        let rotation = RotationQueue::new(vec![
            "alpha".to_string(),
            "".to_string(),
            "  ".to_string(),
            "beta".to_string(),
        ])
        .unwrap();
        assert_eq!(rotation.entries(), &["alpha", "beta"]);
    }

    #[test]
    fn empty_rotation_is_a_configuration_error() {
        assert!(RotationQueue::new(vec![]).is_err());
        assert!(RotationQueue::new(vec!["   ".to_string()]).is_err());
    }

    #[tokio::test]
    async fn missing_rotation_file_is_fatal() {
        let missing = std::path::Path::new("/definitely/not/here/rotation.txt");
        assert!(RotationQueue::load(missing).await.is_err());
    }

    #[tokio::test]
    async fn rotation_loads_from_newline_delimited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotation.txt");
        tokio::fs::write(&path, "skyward\nbastion\n\nfoundry\n")
            .await
            .unwrap();

        let rotation = RotationQueue::load(&path).await.unwrap();
        assert_eq!(rotation.entries(), &["skyward", "bastion", "foundry"]);
        assert_eq!(rotation.current(), "skyward");
    }
}

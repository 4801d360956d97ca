//! In-process headless Engine Host adapter.
//!
//! Lets the server run a complete match loop without a game engine
//! attached: environments live in an in-memory registry and per-participant
//! calls are surfaced as log output. Useful for soak-testing rotations and
//! playfield templates before wiring the engine into a real host.

use async_trait::async_trait;
use match_engine::{EngineHost, EnvironmentHandle, GeneratorMode, HostError, ParticipantId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Headless host: environment lifecycle is tracked in memory, visibility
/// and placement calls become debug logs.
#[derive(Default)]
pub struct LocalHost {
    environments: Mutex<HashMap<String, EnvironmentHandle>>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance names of the environments currently registered.
    pub fn environment_names(&self) -> Vec<String> {
        self.environments
            .lock()
            .expect("environment registry poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EngineHost for LocalHost {
    async fn show(&self, observer: ParticipantId, target: ParticipantId) {
        debug!("show: {} -> {}", observer, target);
    }

    async fn hide(&self, observer: ParticipantId, target: ParticipantId) {
        debug!("hide: {} -> {}", observer, target);
    }

    async fn set_collidable(&self, participant: ParticipantId, collidable: bool) {
        debug!("collidable: {} = {}", participant, collidable);
    }

    async fn send_message(&self, participant: ParticipantId, message: &str) {
        debug!("message to {}: {}", participant, message);
    }

    async fn create_environment(
        &self,
        instance_id: &str,
        directory: &Path,
        generator: GeneratorMode,
    ) -> Result<EnvironmentHandle, HostError> {
        if generator != GeneratorMode::None {
            return Err(HostError::Refused(
                "headless host only supports pre-built instances".to_string(),
            ));
        }
        if !directory.is_dir() {
            return Err(HostError::Internal(format!(
                "instance directory {} does not exist",
                directory.display()
            )));
        }
        let handle = EnvironmentHandle::new(instance_id, directory);
        self.environments
            .lock()
            .expect("environment registry poisoned")
            .insert(instance_id.to_string(), handle.clone());
        info!("🌍 Environment {} online", instance_id);
        Ok(handle)
    }

    async fn set_auto_persist(&self, environment: &EnvironmentHandle, enabled: bool) {
        debug!("auto-persist for {}: {}", environment.instance_id, enabled);
    }

    async fn preload_region(
        &self,
        environment: &EnvironmentHandle,
        x: i32,
        z: i32,
    ) -> Result<(), HostError> {
        debug!("preload region ({x}, {z}) of {}", environment.instance_id);
        Ok(())
    }

    async fn unload_environment(
        &self,
        environment: &EnvironmentHandle,
        _save: bool,
    ) -> Result<(), HostError> {
        self.environments
            .lock()
            .expect("environment registry poisoned")
            .remove(&environment.instance_id);
        info!("🌑 Environment {} offline", environment.instance_id);
        Ok(())
    }

    async fn force_detach_environment(&self, instance_id: &str) -> Result<(), HostError> {
        self.environments
            .lock()
            .expect("environment registry poisoned")
            .remove(instance_id);
        Ok(())
    }

    async fn find_environment(&self, instance_id: &str) -> Option<EnvironmentHandle> {
        self.environments
            .lock()
            .expect("environment registry poisoned")
            .get(instance_id)
            .cloned()
    }

    async fn relocate(
        &self,
        participant: ParticipantId,
        environment: &EnvironmentHandle,
    ) -> Result<(), HostError> {
        debug!("relocate {} into {}", participant, environment.instance_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn environments_register_and_unload() {
        let dir = tempfile::tempdir().unwrap();
        let host = LocalHost::new();

        let env = host
            .create_environment("48213", dir.path(), GeneratorMode::None)
            .await
            .unwrap();
        assert_eq!(host.environment_names(), vec!["48213".to_string()]);
        assert_eq!(host.find_environment("48213").await, Some(env.clone()));

        host.unload_environment(&env, false).await.unwrap();
        assert!(host.environment_names().is_empty());
        assert!(host.find_environment("48213").await.is_none());
    }

    #[tokio::test]
    async fn procedural_generation_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let host = LocalHost::new();

        let result = host
            .create_environment("48213", dir.path(), GeneratorMode::Default)
            .await;
        assert!(matches!(result, Err(HostError::Refused(_))));
    }

    #[tokio::test]
    async fn missing_instance_directory_is_an_error() {
        let host = LocalHost::new();
        let result = host
            .create_environment("48213", Path::new("/no/such/instance"), GeneratorMode::None)
            .await;
        assert!(matches!(result, Err(HostError::Internal(_))));
    }
}

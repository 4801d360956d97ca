//! Engine Host capability boundary.
//!
//! The match engine owns no rendering, networking, or world simulation of
//! its own; everything it needs from the surrounding game engine is
//! expressed here as one async trait. The host is handed in at construction
//! so the core can be driven headless in tests and tools.
//!
//! Environment removal is a two-step contract: a graceful
//! [`EngineHost::unload_environment`] first, and if the host refuses
//! because live references remain, the explicitly-granted
//! [`EngineHost::force_detach_environment`] capability. The engine never
//! reaches into host-internal structures.

use crate::error::HostError;
use crate::types::ParticipantId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Terrain generation mode requested when instantiating an environment.
///
/// Playfield templates are fully pre-built, so rounds always request
/// [`GeneratorMode::None`]; the variant exists so the request is explicit
/// at the call site rather than an implicit host default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorMode {
    /// Produce nothing; the instance directory already holds all data.
    None,
    /// Host-default procedural generation.
    Default,
}

/// Handle to a live runtime environment bound to an instance directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentHandle {
    /// Name the environment is registered under with the host (the round's
    /// instance-directory name).
    pub instance_id: String,
    /// Directory tree backing this instance.
    pub directory: PathBuf,
}

impl EnvironmentHandle {
    pub fn new(instance_id: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            instance_id: instance_id.into(),
            directory: directory.into(),
        }
    }
}

/// Capabilities the match engine consumes from the surrounding game engine.
///
/// Visibility calls are fire-and-forget: hosts treat them as idempotent
/// display-state writes, so they carry no error channel. Environment
/// lifecycle calls are fallible because the engine's control flow branches
/// on their outcome.
#[async_trait]
pub trait EngineHost: Send + Sync {
    /// Makes `target` visible to `observer`.
    async fn show(&self, observer: ParticipantId, target: ParticipantId);

    /// Makes `target` invisible to `observer`.
    async fn hide(&self, observer: ParticipantId, target: ParticipantId);

    /// Sets whether `participant` collides with the environment and others.
    async fn set_collidable(&self, participant: ParticipantId, collidable: bool);

    /// Delivers a chat-level message to `participant`.
    async fn send_message(&self, participant: ParticipantId, message: &str);

    /// Instantiates a runtime environment bound to `directory`, registered
    /// under `instance_id`, using the requested terrain generator.
    async fn create_environment(
        &self,
        instance_id: &str,
        directory: &Path,
        generator: GeneratorMode,
    ) -> Result<EnvironmentHandle, HostError>;

    /// Disables or enables automatic persistence for the instance.
    /// Disposable round instances always run with persistence off.
    async fn set_auto_persist(&self, environment: &EnvironmentHandle, enabled: bool);

    /// Forces the origin region of the environment to load so the instance
    /// is immediately usable after creation.
    async fn preload_region(&self, environment: &EnvironmentHandle, x: i32, z: i32)
        -> Result<(), HostError>;

    /// Gracefully unloads the environment. `save` is always `false` for
    /// round instances. May return [`HostError::Refused`] while live
    /// references remain.
    async fn unload_environment(
        &self,
        environment: &EnvironmentHandle,
        save: bool,
    ) -> Result<(), HostError>;

    /// Strips a stuck environment from the host's live-instance registry.
    /// Granted intentionally by the host as the fallback when a graceful
    /// unload is refused.
    async fn force_detach_environment(&self, instance_id: &str) -> Result<(), HostError>;

    /// Looks up a still-registered environment by instance name.
    async fn find_environment(&self, instance_id: &str) -> Option<EnvironmentHandle>;

    /// Moves `participant` into `environment` at its origin.
    async fn relocate(
        &self,
        participant: ParticipantId,
        environment: &EnvironmentHandle,
    ) -> Result<(), HostError>;
}

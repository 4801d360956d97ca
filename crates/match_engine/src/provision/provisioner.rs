//! Staging and teardown of disposable playfield instances.

use super::fsops;
use crate::catalog::PlayfieldTemplate;
use crate::error::{EngineError, EngineResult};
use crate::host::{EngineHost, EnvironmentHandle, GeneratorMode};
use crate::types::RoundId;
use rand::Rng;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Round identifiers are short numeric tokens in this range; wide enough
/// that redraws against the active set terminate immediately in practice.
const ROUND_ID_MIN: u32 = 10_000;
const ROUND_ID_MAX: u32 = 100_000;

/// Materializes and destroys per-round copies of playfield templates.
///
/// The template directory tree is copied, never mutated; the copy lives
/// under the instances root, named by the round identifier, and is deleted
/// once the round has cycled. Copy and delete both run on the blocking
/// pool and are joined before the provisioner returns, so no round-state
/// transition can observe a half-staged instance.
pub struct EnvironmentProvisioner {
    host: Arc<dyn EngineHost>,
    templates_dir: PathBuf,
    instances_dir: PathBuf,
    /// Rounds whose instance may still exist on disk or in the host.
    /// Fresh identifiers are drawn from outside this set.
    active_rounds: Mutex<HashSet<RoundId>>,
}

impl EnvironmentProvisioner {
    /// Creates a provisioner rooted at the given template and instance
    /// directories.
    pub fn new(host: Arc<dyn EngineHost>, templates_dir: PathBuf, instances_dir: PathBuf) -> Self {
        Self {
            host,
            templates_dir,
            instances_dir,
            active_rounds: Mutex::new(HashSet::new()),
        }
    }

    /// Draws a round identifier distinct from the immediately previous
    /// round's and from every currently-active round's.
    ///
    /// # Arguments
    ///
    /// * `previous` - The prior round's identifier, if one has run
    pub fn generate_round_id(&self, previous: Option<RoundId>) -> RoundId {
        let active = self.active_rounds.lock().expect("active round set poisoned");
        let mut rng = rand::thread_rng();
        loop {
            let candidate = RoundId(rng.gen_range(ROUND_ID_MIN..ROUND_ID_MAX));
            if Some(candidate) == previous || active.contains(&candidate) {
                continue;
            }
            return candidate;
        }
    }

    /// Stages a disposable instance of `template` for `round` and brings
    /// it up through the Engine Host.
    ///
    /// The template tree is copied byte-for-byte into the instance
    /// directory, then the host instantiates the environment with terrain
    /// generation disabled (templates are fully pre-built), persistence
    /// off (the instance is disposable), and the origin region preloaded.
    ///
    /// # Errors
    ///
    /// Any I/O or host failure is a fatal [`EngineError::Provisioning`]:
    /// no round can run without playfield data.
    pub async fn provision(
        &self,
        template: &PlayfieldTemplate,
        round: RoundId,
    ) -> EngineResult<EnvironmentHandle> {
        let source = self.templates_dir.join(template.directory());
        let destination = self.instances_dir.join(round.as_instance_name());
        info!(
            "🌍 Staging playfield '{}' as instance {}",
            template.name(),
            round
        );

        let copy_src = source.clone();
        let copy_dest = destination.clone();
        tokio::task::spawn_blocking(move || fsops::copy_tree(&copy_src, &copy_dest))
            .await
            .map_err(|e| EngineError::Provisioning(format!("copy task panicked: {e}")))?
            .map_err(|e| {
                EngineError::Provisioning(format!(
                    "failed to copy template '{}' to {}: {e}",
                    template.name(),
                    destination.display()
                ))
            })?;

        let environment = self
            .host
            .create_environment(&round.as_instance_name(), &destination, GeneratorMode::None)
            .await
            .map_err(|e| {
                EngineError::Provisioning(format!(
                    "host failed to create environment {round}: {e}"
                ))
            })?;

        self.host.set_auto_persist(&environment, false).await;
        self.host
            .preload_region(&environment, 0, 0)
            .await
            .map_err(|e| {
                EngineError::Provisioning(format!("failed to preload origin of {round}: {e}"))
            })?;

        self.active_rounds
            .lock()
            .expect("active round set poisoned")
            .insert(round);

        info!("✅ Instance {} ready at {}", round, destination.display());
        Ok(environment)
    }

    /// Tears down the instance of a finished round: unloads the
    /// environment if the host still has it, then deletes the instance
    /// directory.
    ///
    /// A fresh copy is staged whenever the same playfield is played again,
    /// so nothing here is preserved. Returns whether the directory is
    /// fully gone; failures are logged and non-fatal, since they only leak
    /// a disposable resource.
    pub async fn reclaim(&self, round: RoundId) -> bool {
        let instance_id = round.as_instance_name();

        if let Some(environment) = self.host.find_environment(&instance_id).await {
            info!("Unloading environment {}", instance_id);
            if let Err(e) = self.host.unload_environment(&environment, false).await {
                warn!("Graceful unload of {} refused: {e}; forcing detach", instance_id);
                if let Err(e) = self.host.force_detach_environment(&instance_id).await {
                    warn!("Forced detach of {} failed: {e}", instance_id);
                }
            }
        }

        let directory = self.instances_dir.join(&instance_id);
        let deleted = tokio::task::spawn_blocking(move || fsops::remove_tree(&directory))
            .await
            .unwrap_or(false);

        if deleted {
            self.active_rounds
                .lock()
                .expect("active round set poisoned")
                .remove(&round);
        } else {
            warn!("Failed to fully delete instance directory for round {}", round);
        }
        deleted
    }

    /// Rounds whose instances have been staged and not yet reclaimed.
    pub fn active_rounds(&self) -> HashSet<RoundId> {
        self.active_rounds
            .lock()
            .expect("active round set poisoned")
            .clone()
    }
}

impl std::fmt::Debug for EnvironmentProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentProvisioner")
            .field("templates_dir", &self.templates_dir)
            .field("instances_dir", &self.instances_dir)
            .finish_non_exhaustive()
    }
}

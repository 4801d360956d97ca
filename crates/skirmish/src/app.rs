//! Main application logic and lifecycle management.
//!
//! This module contains the core `Application` struct that orchestrates
//! engine assembly, the match loop, monitoring, and graceful shutdown.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    host::LocalHost,
    logging::display_banner,
    rulesets::BuiltinRulesets,
    signals::wait_for_shutdown,
};
use match_engine::{
    create_engine, DefaultSessionFactory, Engine, MatchEvent, ParticipantId, PlayfieldTemplate,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main application struct for the Skirmish match server.
///
/// Manages the complete lifecycle of the server: configuration loading,
/// engine assembly over the headless host, the boot transition into the
/// first round, periodic status reporting, and graceful shutdown that
/// reclaims the live round instance.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Assembled match engine
    engine: Engine,
    /// Number of synthetic participants to craft at startup
    simulate: usize,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// Loads configuration, applies CLI overrides, validates settings,
    /// discovers playfield templates, and assembles the engine.
    ///
    /// # Arguments
    ///
    /// * `args` - Parsed command-line arguments
    ///
    /// # Returns
    ///
    /// A configured `Application` ready to run, or an error if
    /// initialization failed.
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        // Apply CLI overrides
        if let Some(playfields_dir) = args.playfields_dir {
            config.engine.playfields_dir = playfields_dir.to_string_lossy().to_string();
        }

        if let Some(rotation_file) = args.rotation_file {
            config.engine.rotation_file = rotation_file.to_string_lossy().to_string();
        }

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        let templates = discover_templates(Path::new(&config.engine.playfields_dir))?;
        let engine = create_engine(
            config.to_engine_config(),
            Arc::new(LocalHost::new()),
            templates,
            &BuiltinRulesets,
            Arc::new(DefaultSessionFactory),
        )
        .await?;

        info!("🚀 Skirmish Match Server v0.1.0");
        info!(
            "📂 Config: {} | Playfields: {} | Rotation: {}",
            args.config_path.display(),
            config.engine.playfields_dir,
            config.engine.rotation_file
        );

        Ok(Self {
            config,
            engine,
            simulate: args.simulate,
        })
    }

    /// Runs the application until a shutdown signal arrives.
    ///
    /// Boots the first round, keeps a periodic status report going, logs
    /// engine events as they happen, and performs graceful cleanup on
    /// shutdown.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting Skirmish Match Server");
        self.log_configuration_summary();

        let controller = self.engine.controller.clone();
        let directory = self.engine.directory.clone();

        // Surface engine events in the log.
        let mut events = self.engine.events.subscribe();
        let event_handle = tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                match event {
                    MatchEvent::RoundStarted {
                        playfield,
                        ruleset,
                        round_id,
                    } => info!("📣 Round {round_id} started: '{playfield}' ({ruleset})"),
                    MatchEvent::RoundEnded { playfield, round_id } => {
                        info!("📣 Round {round_id} ended on '{playfield}'")
                    }
                    MatchEvent::ParticipantJoined { identity } => {
                        info!("📣 Participant joined: {identity}")
                    }
                    MatchEvent::ParticipantLeft { identity } => {
                        info!("📣 Participant left: {identity}")
                    }
                    MatchEvent::ParticipantEliminated { identity } => {
                        info!("📣 Participant eliminated: {identity}")
                    }
                }
            }
        });

        // Synthetic participants for headless soak runs.
        for n in 0..self.simulate {
            let identity = ParticipantId::new();
            directory.craft_session(identity).await;
            directory.set_joined(identity, true).await;
            info!("🤖 Simulated participant {} online ({identity})", n + 1);
        }

        // Boot transition: select and stage the first round. From here the
        // cycle sustains itself through the grace and countdown timers.
        controller.next_round().await?;

        // Periodic status reporting.
        let monitoring_handle = {
            let controller = controller.clone();
            let directory = directory.clone();
            let interval_secs = self.config.engine.status_interval_secs;
            tokio::spawn(async move {
                if interval_secs == 0 {
                    return;
                }
                let mut interval =
                    tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
                interval.tick().await;
                loop {
                    interval.tick().await;
                    let state = controller.state().await;
                    info!(
                        "📊 Status: {} | playfield: {} | round: {} | participants: {}",
                        state.status,
                        state.current_playfield.as_deref().unwrap_or("-"),
                        state
                            .round_id
                            .map(|r| r.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        directory.session_count().await
                    );
                }
            })
        };

        info!("✅ Skirmish Server is now running!");
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        wait_for_shutdown().await?;

        info!("🛑 Shutdown signal received, beginning graceful shutdown...");
        monitoring_handle.abort();
        event_handle.abort();

        // Reclaim the live round instance so nothing disposable leaks.
        controller.shutdown_cleanup().await;

        let remaining = controller.active_rounds();
        if remaining.is_empty() {
            info!("✅ All round instances reclaimed");
        } else {
            warn!("⚠️ {} round instance(s) left behind", remaining.len());
        }

        info!("📊 Final Statistics:");
        info!("  - Participants online: {}", directory.session_count().await);
        info!("  - Last status: {}", controller.status().await);

        info!("✅ Skirmish Match Server shutdown complete");
        Ok(())
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🗺️ Playfields: {}", self.config.engine.playfields_dir);
        info!("  🌍 Instances: {}", self.config.engine.instances_dir);
        info!("  🔁 Rotation: {}", self.config.engine.rotation_file);
        info!(
            "  ⏱️ Cycle grace: {}s | Countdown: {}s",
            self.config.engine.cycle_grace_secs, self.config.engine.countdown_secs
        );
    }
}

/// Discovers playfield templates by scanning the templates directory: one
/// subdirectory per playfield, all running the built-in ruleset.
fn discover_templates(
    playfields_dir: &Path,
) -> Result<Vec<PlayfieldTemplate>, Box<dyn std::error::Error>> {
    if !playfields_dir.is_dir() {
        return Err(format!(
            "Playfields directory {} does not exist",
            playfields_dir.display()
        )
        .into());
    }

    let mut templates = Vec::new();
    for entry in std::fs::read_dir(playfields_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            templates.push(PlayfieldTemplate::new(
                name.clone(),
                name,
                vec!["Deathmatch".to_string()],
            ));
        }
    }

    if templates.is_empty() {
        error!(
            "No playfield templates found under {}",
            playfields_dir.display()
        );
    } else {
        info!("🗺️ Discovered {} playfield template(s)", templates.len());
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_templates_lists_subdirectories_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("skyward")).unwrap();
        std::fs::create_dir(dir.path().join("bastion")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

        let mut names: Vec<String> = discover_templates(dir.path())
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["bastion", "skyward"]);
    }

    #[test]
    fn discover_templates_requires_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_templates(&dir.path().join("missing")).is_err());
    }
}

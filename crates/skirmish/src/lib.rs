//! # Skirmish Match Server - Main Entry Point
//!
//! Round-based team match server running on disposable playfields. This
//! entry point handles CLI parsing, configuration loading, and application
//! lifecycle management around the `match_engine` core.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! skirmish
//!
//! # Specify custom configuration
//! skirmish --config production.toml
//!
//! # Override specific settings
//! skirmish --playfields /srv/playfields --rotation rotation.list --log-level debug
//!
//! # Headless soak run with synthetic participants
//! skirmish --simulate 8
//! ```
//!
//! ## Configuration
//!
//! The server loads configuration from a TOML file (default:
//! `config.toml`). If the file doesn't exist, a default configuration will
//! be created.
//!
//! ## Signal Handling
//!
//! The server handles graceful shutdown on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)
//!
//! On shutdown the live round instance is reclaimed before the process
//! exits, so disposable playfield copies never accumulate on disk.

use tracing::error;

mod app;
mod cli;
mod config;
mod host;
mod logging;
mod rulesets;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the Skirmish match server.
///
/// Handles the complete application lifecycle including:
/// 1. Command-line argument parsing
/// 2. Configuration loading and validation
/// 3. Logging system initialization
/// 4. Application creation and execution
/// 5. Error handling and cleanup
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments first
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    // Create and run application
    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

// Re-export main types for potential library usage
pub use config::{EngineSettings, LoggingSettings};
pub use host::LocalHost;
pub use rulesets::{BuiltinRulesets, Deathmatch};

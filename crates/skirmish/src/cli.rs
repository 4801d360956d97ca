//! Command-line interface handling for the Skirmish match server.
//!
//! This module provides command-line argument parsing and CLI interface
//! management using the `clap` crate for robust argument handling.

use clap::{Arg, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// This structure holds all the command-line options that can be used to
/// override configuration file settings or provide runtime parameters.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for the playfield templates directory
    pub playfields_dir: Option<PathBuf>,
    /// Optional override for the rotation list file
    pub rotation_file: Option<PathBuf>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Number of synthetic participants to craft at startup (dev harness)
    pub simulate: usize,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    ///
    /// Sets up the command-line interface with all available options and
    /// returns a structured representation of the parsed arguments.
    ///
    /// # Returns
    ///
    /// A `CliArgs` instance containing all parsed command-line options.
    pub fn parse() -> Self {
        let matches = Command::new("Skirmish Match Server")
            .version("0.1.0")
            .about("Round-based team match server on disposable playfields")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("config.toml"),
            )
            .arg(
                Arg::new("playfields")
                    .short('p')
                    .long("playfields")
                    .value_name("DIR")
                    .help("Playfield templates directory path"),
            )
            .arg(
                Arg::new("rotation")
                    .short('r')
                    .long("rotation")
                    .value_name("FILE")
                    .help("Rotation list file path"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("simulate")
                    .long("simulate")
                    .value_name("COUNT")
                    .help("Craft COUNT synthetic opted-in participants at startup")
                    .default_value("0"),
            )
            .get_matches();

        Self {
            config_path: PathBuf::from(
                matches
                    .get_one::<String>("config")
                    .expect("Default config path should always be set"),
            ),
            playfields_dir: matches.get_one::<String>("playfields").map(PathBuf::from),
            rotation_file: matches.get_one::<String>("rotation").map(PathBuf::from),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            simulate: matches
                .get_one::<String>("simulate")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}

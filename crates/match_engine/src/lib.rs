//! # Match Engine - Session-Management Core
//!
//! The session-management core of a team-based multiplayer match engine.
//! It drives repeated rounds of a competitive game on ephemeral, disposable
//! playfields, assigns connected participants to teams, and keeps each
//! participant's visibility of the others consistent with their current
//! role (active competitor vs. observer).
//!
//! ## Design Philosophy
//!
//! The core contains **no gameplay rules** - it only provides the
//! round-boundary machinery that every mode shares:
//!
//! * **Lifecycle state machine** - Sequences a round from idle through play
//!   to cleanup and back, indefinitely
//! * **Ephemeral environment provisioning** - Materializes, isolates, and
//!   tears down a disposable copy of a playfield per round under a
//!   collision-resistant identifier
//! * **Participant registry & visibility engine** - Tracks connected
//!   participants and keeps the pairwise visibility relation consistent as
//!   team membership changes
//! * **Rotation & catalog** - Selects which playfield and ruleset run next
//!
//! Everything game-specific plugs in through small capability objects
//! handed over at construction: a [`Ruleset`] owns in-round behavior, a
//! [`SessionFactory`] shapes fresh sessions, a [`RulesetSelector`] decides
//! among a playfield's supported modes, and an [`EngineHost`] supplies the
//! runtime primitives (visibility control, environment lifecycle,
//! participant placement) of the surrounding game engine.
//!
//! ## Architecture Overview
//!
//! ### Control Flow
//!
//! 1. [`MatchController::end_cycle`] advances the rotation and resolves the
//!    next playfield and ruleset through the [`Catalog`]
//! 2. [`MatchController::pre_match`] draws a fresh round identifier, stages
//!    the environment through the [`EnvironmentProvisioner`], relocates
//!    everyone as observers, and starts the countdown
//! 3. [`MatchController::match_start`] binds the round's teams and hands
//!    control to the active ruleset
//! 4. The ruleset's win conditions trigger [`MatchController::match_end`],
//!    which cleans up and opens the cycle window via
//!    [`MatchController::start_cycle`]
//!
//! All state mutation runs on one logical simulation flow; transitions
//! attempted from the wrong state are logged no-ops.
//!
//! ## Error Handling
//!
//! Structured error types ([`EngineError`]) categorize failures the way the
//! round cycle experiences them:
//!
//! * **Configuration errors** - Rotation or catalog resources unusable;
//!   fatal at startup
//! * **Provisioning errors** - Template copy or environment creation
//!   failed; fatal at the point of use, because a round without a valid
//!   playfield must not proceed
//!
//! Lookup misses return `Option` and are the caller's to handle; cleanup
//! failures are logged and absorbed, leaking at worst a disposable
//! instance.

// Re-export core types and functions for easy access
pub use catalog::{Catalog, PlayfieldTemplate};
pub use config::EngineConfig;
pub use control::{MatchController, MatchState, MatchStatus};
pub use error::{EngineError, EngineResult, HostError};
pub use events::{EventBus, MatchEvent};
pub use host::{EngineHost, EnvironmentHandle, GeneratorMode};
pub use provision::EnvironmentProvisioner;
pub use rotation::RotationQueue;
pub use ruleset::{FirstListedSelector, Ruleset, RulesetLoader, RulesetSelector};
pub use session::{DefaultSessionFactory, ParticipantDirectory, ParticipantSession, SessionFactory};
pub use team::{TeamInstance, TeamTemplate};
pub use types::{ParticipantId, RoundId, RuntimeTeam, TeamColor, TeamId};
pub use utils::{create_engine, create_engine_with_selector, Engine};

// Public module declarations
pub mod catalog;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod host;
pub mod provision;
pub mod rotation;
pub mod ruleset;
pub mod session;
pub mod team;
pub mod types;
pub mod utils;

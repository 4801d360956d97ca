//! Match status and the singleton state record behind the controller.

use crate::types::RoundId;
use serde::{Deserialize, Serialize};

/// Current stage of the match cycle.
///
/// The machine loops `None → Starting → Playing → Cycle → Starting → …`
/// for as long as the process runs; `None` is only ever seen before the
/// first round is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// No round has been established yet.
    None,
    /// The next round's environment is being provisioned and the countdown
    /// is in progress.
    Starting,
    /// A round is actively being played.
    Playing,
    /// The round has ended; cleanup/celebration window before the next
    /// selection.
    Cycle,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MatchStatus::None => "NONE",
            MatchStatus::Starting => "STARTING",
            MatchStatus::Playing => "PLAYING",
            MatchStatus::Cycle => "CYCLE",
        };
        write!(f, "{label}")
    }
}

/// Singleton-per-process record of where the match cycle stands.
///
/// Mutated only by the controller. The rotation cursor, also part of the
/// conceptual match state, lives inside the rotation queue it indexes.
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Current stage of the cycle.
    pub status: MatchStatus,
    /// Playfield currently selected or being played, if any.
    pub current_playfield: Option<String>,
    /// Playfield played prior to the last cycle, if any.
    pub previous_playfield: Option<String>,
    /// Identifier of the current round, if one has been staged.
    pub round_id: Option<RoundId>,
    /// Identifier of the immediately preceding round.
    pub previous_round: Option<RoundId>,
}

impl MatchState {
    /// Initial state: nothing established.
    pub fn new() -> Self {
        Self {
            status: MatchStatus::None,
            current_playfield: None,
            previous_playfield: None,
            round_id: None,
            previous_round: None,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

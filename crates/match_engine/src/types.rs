//! # Core Type Definitions
//!
//! Fundamental identifier types used throughout the match engine. These
//! wrapper types prevent ID confusion (a `ParticipantId` can never be passed
//! where a `RoundId` is expected) and carry their own serialization support
//! so they can travel inside produced events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connected participant.
///
/// This is a wrapper around UUID that provides type safety and ensures
/// participant IDs cannot be confused with other types of IDs in the system.
///
/// # Examples
///
/// ```rust
/// use match_engine::ParticipantId;
///
/// // Create a new random participant ID
/// let participant_id = ParticipantId::new();
///
/// // Convert to string for logging/display
/// println!("Participant ID: {}", participant_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Creates a new random participant ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a participant ID from a string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - A string slice containing a valid UUID
    ///
    /// # Returns
    ///
    /// Returns `Ok(ParticipantId)` if the string is a valid UUID, otherwise
    /// returns `Err(uuid::Error)` with details about the parsing failure.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for ParticipantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short numeric token naming one round and its disposable environment.
///
/// The token doubles as the instance directory name, so it must not collide
/// with any round whose environment may still be on disk. Uniqueness is
/// enforced by the provisioner against the previous round's token and the
/// set of currently-active tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundId(pub u32);

impl RoundId {
    /// Returns the token as the instance-directory name it maps to.
    pub fn as_instance_name(&self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable team identifier, shared by a template and every per-round
/// instance cloned from it. Sessions reference their team through this id
/// only; rosters are derived from the registry on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Handle to the runtime team object owned exclusively by the current
/// round. Created only after the round's environment exists and never
/// reused across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeTeam(pub Uuid);

impl RuntimeTeam {
    /// Creates a fresh runtime binding for the current round.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RuntimeTeam {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RuntimeTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display color assigned to a team in its template.
///
/// Rendered as a lowercase tag in logs and chat-level output; the concrete
/// presentation (palette, formatting codes) belongs to the embedding game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Blue,
    Green,
    Yellow,
    Aqua,
    Purple,
    Gray,
    White,
}

impl TeamColor {
    /// Lowercase tag used when rendering the color in text output.
    pub fn tag(&self) -> &'static str {
        match self {
            TeamColor::Red => "red",
            TeamColor::Blue => "blue",
            TeamColor::Green => "green",
            TeamColor::Yellow => "yellow",
            TeamColor::Aqua => "aqua",
            TeamColor::Purple => "purple",
            TeamColor::Gray => "gray",
            TeamColor::White => "white",
        }
    }
}

impl std::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

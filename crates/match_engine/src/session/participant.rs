//! Per-connection participant state.

use crate::types::{ParticipantId, TeamId};
use std::collections::HashSet;

/// State tracked for one connected participant.
///
/// A session is exclusively owned by the
/// [`ParticipantDirectory`](crate::session::ParticipantDirectory); team
/// membership is mutated only through the directory so visibility
/// recomputation can never be skipped. A participant with a team is
/// *competing*; one without is *observing*.
#[derive(Debug)]
pub struct ParticipantSession {
    identity: ParticipantId,
    display_name: String,
    current_team: Option<TeamId>,
    joined: bool,

    /// Targets this session currently cannot see, as last applied to the
    /// host. Used to diff desired visibility against applied visibility so
    /// recomputation stays idempotent.
    pub(crate) hidden: HashSet<ParticipantId>,
    /// Collision state as last applied to the host; `None` until the first
    /// recomputation runs.
    pub(crate) collidable: Option<bool>,
}

impl ParticipantSession {
    /// Creates a fresh session in the observing role.
    pub fn new(identity: ParticipantId, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            current_team: None,
            joined: false,
            hidden: HashSet::new(),
            collidable: None,
        }
    }

    /// Stable identity of the underlying connection.
    pub fn identity(&self) -> ParticipantId {
        self.identity
    }

    /// Human-readable name for logs and messages.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The team this session currently holds, if competing.
    pub fn current_team(&self) -> Option<&TeamId> {
        self.current_team.as_ref()
    }

    /// Whether the participant has opted in to play upcoming rounds.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Whether the participant is actually in the currently active round.
    pub fn is_competing(&self) -> bool {
        self.current_team.is_some()
    }

    /// Whether this session can currently see `target`.
    pub fn sees(&self, target: ParticipantId) -> bool {
        !self.hidden.contains(&target)
    }

    pub(crate) fn set_joined(&mut self, joined: bool) {
        self.joined = joined;
    }

    pub(crate) fn set_current_team(&mut self, team: Option<TeamId>) {
        self.current_team = team;
    }
}

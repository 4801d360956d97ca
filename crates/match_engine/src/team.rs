//! Team templates and their per-round instances.
//!
//! A [`TeamTemplate`] is immutable configuration: it describes a team the
//! way a ruleset declares it. A [`TeamInstance`] is the round-scoped clone
//! actually used during play; it carries the binding to the runtime team
//! object, which can only exist once the round's environment does, and is
//! destroyed and re-created every round.

use crate::types::{RuntimeTeam, TeamColor, TeamId};
use serde::{Deserialize, Serialize};

/// Immutable description of a team as declared by a ruleset.
///
/// Capacity is advisory: the engine exposes it but never enforces it;
/// enforcement, if any, is a ruleset-level concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTemplate {
    name: String,
    color: TeamColor,
    capacity: Option<usize>,
    board_id: String,
}

impl TeamTemplate {
    /// Creates a template with no capacity limit; the stable identifier
    /// defaults to the team name.
    pub fn new(name: impl Into<String>, color: TeamColor) -> Self {
        let name = name.into();
        let board_id = name.clone();
        Self {
            name,
            color,
            capacity: None,
            board_id,
        }
    }

    /// Creates a template with an advisory capacity limit.
    pub fn with_capacity(name: impl Into<String>, color: TeamColor, capacity: usize) -> Self {
        let mut template = Self::new(name, color);
        template.capacity = Some(capacity);
        template
    }

    /// Overrides the stable identifier used for runtime-binding lookups,
    /// for rulesets whose display names are not unique enough.
    pub fn with_board_id(mut self, board_id: impl Into<String>) -> Self {
        self.board_id = board_id.into();
        self
    }

    /// The team's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The team's designated display color.
    pub fn color(&self) -> TeamColor {
        self.color
    }

    /// Advisory maximum roster size, unbounded when `None`.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Stable identifier shared by every instance cloned from this template.
    pub fn id(&self) -> TeamId {
        TeamId::new(self.board_id.clone())
    }

    /// Creates a clean, round-scoped copy of this template. The runtime
    /// binding starts empty and is filled in after the round's environment
    /// exists.
    pub fn instantiate(&self) -> TeamInstance {
        TeamInstance {
            template: self.clone(),
            binding: None,
        }
    }
}

impl std::fmt::Display for TeamTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Round-scoped clone of a [`TeamTemplate`] plus its runtime binding.
///
/// Never reused across rounds: the binding belongs exclusively to the round
/// that created it.
#[derive(Debug, Clone)]
pub struct TeamInstance {
    template: TeamTemplate,
    binding: Option<RuntimeTeam>,
}

impl TeamInstance {
    /// The immutable template this instance was cloned from.
    pub fn template(&self) -> &TeamTemplate {
        &self.template
    }

    /// The team's display name.
    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Stable identifier used by sessions referencing this team.
    pub fn id(&self) -> TeamId {
        self.template.id()
    }

    /// Attaches the runtime team object for the current round.
    pub fn bind(&mut self, binding: RuntimeTeam) {
        self.binding = Some(binding);
    }

    /// The runtime binding, if the round has established one yet.
    pub fn binding(&self) -> Option<RuntimeTeam> {
        self.binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_defaults_are_unbounded_with_name_as_id() {
        let template = TeamTemplate::new("Red Team", TeamColor::Red);
        assert_eq!(template.name(), "Red Team");
        assert_eq!(template.capacity(), None);
        assert_eq!(template.id(), TeamId::from("Red Team"));
    }

    #[test]
    fn capacity_is_exposed_but_instances_share_the_template_id() {
        let template = TeamTemplate::with_capacity("Blue Team", TeamColor::Blue, 8)
            .with_board_id("blue");
        assert_eq!(template.capacity(), Some(8));

        let instance = template.instantiate();
        assert_eq!(instance.id(), TeamId::from("blue"));
        assert_eq!(instance.name(), "Blue Team");
        assert_eq!(instance.template().capacity(), Some(8));
    }

    #[test]
    fn instances_start_unbound_and_bind_once_per_round() {
        let template = TeamTemplate::new("Green Team", TeamColor::Green);
        let mut instance = template.instantiate();
        assert!(instance.binding().is_none());

        let runtime = RuntimeTeam::new();
        instance.bind(runtime);
        assert_eq!(instance.binding(), Some(runtime));

        // A second instantiation is a fresh clone with no carried binding.
        let next_round = template.instantiate();
        assert!(next_round.binding().is_none());
    }
}

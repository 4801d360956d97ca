//! The ruleset seam and injected capability objects.
//!
//! The controller owns round-boundary bookkeeping; everything that happens
//! *inside* a round belongs to a pluggable [`Ruleset`]. Concrete games hand
//! their rulesets, session construction, and multi-ruleset selection policy
//! to the engine as small capability objects at construction time; there
//! are no required-override base classes.

use crate::catalog::PlayfieldTemplate;
use crate::session::ParticipantDirectory;
use crate::team::{TeamInstance, TeamTemplate};
use async_trait::async_trait;
use std::sync::Arc;

/// Pluggable gameplay logic owning in-round behavior.
///
/// The controller hands control over at round start and takes it back at
/// round end; in between, the ruleset decides team membership, win
/// conditions, and when to trigger the end of the match. A ruleset must
/// never drive the round-boundary transitions itself.
#[async_trait]
pub trait Ruleset: Send + Sync {
    /// Name this ruleset is registered under in the catalog.
    fn name(&self) -> &str;

    /// Teams this ruleset fields, as immutable templates. Instantiated
    /// fresh by the controller every round.
    fn teams(&self) -> Vec<TeamTemplate>;

    /// Called when the round transitions into active play. The ruleset
    /// assigns teams and initializes round-specific state here.
    async fn on_round_start(&self, directory: &ParticipantDirectory, teams: &[TeamInstance]);

    /// Called when the round has ended, before the cycle window begins.
    async fn on_round_end(&self, directory: &ParticipantDirectory);
}

/// Supplies the ruleset definitions the catalog is populated with at
/// startup.
pub trait RulesetLoader: Send + Sync {
    fn load(&self) -> Vec<Arc<dyn Ruleset>>;
}

/// Chooses which ruleset runs next on a playfield that supports several.
///
/// The reference selection step is a vote held during the cycle window;
/// that machinery lives outside the core, so the policy is injected.
pub trait RulesetSelector: Send + Sync {
    /// Picks one of `candidates` (never empty) for the given playfield.
    fn select<'a>(&self, playfield: &PlayfieldTemplate, candidates: &'a [String]) -> &'a str;
}

/// Default selection policy: the first ruleset the playfield lists.
#[derive(Debug, Default)]
pub struct FirstListedSelector;

impl RulesetSelector for FirstListedSelector {
    fn select<'a>(&self, _playfield: &PlayfieldTemplate, candidates: &'a [String]) -> &'a str {
        &candidates[0]
    }
}

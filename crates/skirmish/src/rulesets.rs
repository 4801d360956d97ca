//! Built-in rulesets shipped with the server binary.

use async_trait::async_trait;
use match_engine::{
    ParticipantDirectory, Ruleset, RulesetLoader, TeamColor, TeamInstance, TeamTemplate,
};
use std::sync::Arc;
use tracing::info;

/// Two-team deathmatch: every opted-in participant is dealt round-robin
/// onto Red or Blue when the round starts.
pub struct Deathmatch;

#[async_trait]
impl Ruleset for Deathmatch {
    fn name(&self) -> &str {
        "Deathmatch"
    }

    fn teams(&self) -> Vec<TeamTemplate> {
        vec![
            TeamTemplate::new("Red Team", TeamColor::Red),
            TeamTemplate::new("Blue Team", TeamColor::Blue),
        ]
    }

    async fn on_round_start(&self, directory: &ParticipantDirectory, teams: &[TeamInstance]) {
        if teams.is_empty() {
            return;
        }
        let joined = directory.joined_participants().await;
        info!(
            "⚔️ Deathmatch starting: dealing {} participant(s) onto {} team(s)",
            joined.len(),
            teams.len()
        );

        for (index, identity) in joined.into_iter().enumerate() {
            let team = &teams[index % teams.len()];
            directory.assign_team(identity, Some(team.id())).await;
            if let Some(name) = directory.display_name(identity).await {
                info!("  {} joins {} ({})", name, team.name(), team.template().color());
            }
        }
    }

    async fn on_round_end(&self, directory: &ParticipantDirectory) {
        directory.broadcast("The round is over!").await;
    }
}

/// Loader exposing the rulesets compiled into this binary.
pub struct BuiltinRulesets;

impl RulesetLoader for BuiltinRulesets {
    fn load(&self) -> Vec<Arc<dyn Ruleset>> {
        vec![Arc::new(Deathmatch)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deathmatch_declares_two_unbounded_teams() {
        let teams = Deathmatch.teams();
        assert_eq!(teams.len(), 2);
        assert!(teams.iter().all(|t| t.capacity().is_none()));
        assert_eq!(teams[0].name(), "Red Team");
        assert_eq!(teams[1].name(), "Blue Team");
    }

    #[test]
    fn builtin_loader_registers_deathmatch() {
        let rulesets = BuiltinRulesets.load();
        assert_eq!(rulesets.len(), 1);
        assert_eq!(rulesets[0].name(), "Deathmatch");
    }
}

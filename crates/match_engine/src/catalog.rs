//! Catalog of playfield templates and ruleset definitions.
//!
//! Both maps are populated once at startup and never mutated at runtime.
//! Lookups are exact-name and return `Option`: an unknown name is the
//! caller's problem to handle explicitly, never silently substituted.

use crate::ruleset::{Ruleset, RulesetLoader};
use crate::team::TeamTemplate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Static description of one playfield available for rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayfieldTemplate {
    name: String,
    directory: String,
    rulesets: Vec<String>,
}

impl PlayfieldTemplate {
    /// Creates a template entry.
    ///
    /// # Arguments
    ///
    /// * `name` - Name the playfield is selected by in the rotation
    /// * `directory` - Template directory name under the templates root
    /// * `rulesets` - Names of the rulesets this playfield supports
    pub fn new(
        name: impl Into<String>,
        directory: impl Into<String>,
        rulesets: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            rulesets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template directory name under the configured templates root.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Rulesets this playfield supports, in declaration order.
    pub fn rulesets(&self) -> &[String] {
        &self.rulesets
    }
}

/// Lookup tables for playfield templates and ruleset definitions.
pub struct Catalog {
    templates: HashMap<String, PlayfieldTemplate>,
    rulesets: HashMap<String, Arc<dyn Ruleset>>,
}

impl Catalog {
    /// Builds the catalog from template entries and the injected ruleset
    /// loader. Later duplicates replace earlier entries of the same name.
    pub fn new(templates: Vec<PlayfieldTemplate>, loader: &dyn RulesetLoader) -> Self {
        let mut template_map = HashMap::new();
        for template in templates {
            template_map.insert(template.name().to_string(), template);
        }

        let mut ruleset_map: HashMap<String, Arc<dyn Ruleset>> = HashMap::new();
        for ruleset in loader.load() {
            ruleset_map.insert(ruleset.name().to_string(), ruleset);
        }

        info!(
            "📚 Catalog loaded: {} playfield(s), {} ruleset(s)",
            template_map.len(),
            ruleset_map.len()
        );

        Self {
            templates: template_map,
            rulesets: ruleset_map,
        }
    }

    /// Returns the playfield template registered under `name`, if any.
    pub fn template(&self, name: &str) -> Option<&PlayfieldTemplate> {
        self.templates.get(name)
    }

    /// Returns the ruleset registered under `name`, if any.
    pub fn ruleset(&self, name: &str) -> Option<Arc<dyn Ruleset>> {
        self.rulesets.get(name).cloned()
    }

    /// Number of registered playfield templates.
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Finds a team from an incomplete or complete name.
    ///
    /// Case-insensitive prefix match over `teams`, returning the first
    /// match in iteration order (first-match, not best-match).
    ///
    /// For example, over `['Red Team', 'Blue Team']`:
    /// input of `"bl"` or `"Bl"` finds `Blue Team`; input of `"r"` finds
    /// `Red Team`.
    pub fn match_team_by_prefix<'t>(
        &self,
        teams: &'t [TeamTemplate],
        preference: &str,
    ) -> Option<&'t TeamTemplate> {
        if preference.is_empty() {
            return None;
        }
        let wanted = preference.to_lowercase();
        teams
            .iter()
            .find(|team| team.name().to_lowercase().starts_with(&wanted))
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("templates", &self.templates.keys())
            .field("rulesets", &self.rulesets.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TeamColor;

    struct EmptyLoader;

    impl RulesetLoader for EmptyLoader {
        fn load(&self) -> Vec<Arc<dyn Ruleset>> {
            Vec::new()
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                PlayfieldTemplate::new("skyward", "skyward", vec!["Deathmatch".to_string()]),
                PlayfieldTemplate::new("bastion", "bastion_v2", vec!["Deathmatch".to_string()]),
            ],
            &EmptyLoader,
        )
    }

    #[test]
    fn exact_name_lookup_hits_and_misses() {
        let catalog = sample_catalog();
        assert_eq!(catalog.template_count(), 2);
        assert_eq!(catalog.template("skyward").unwrap().directory(), "skyward");
        assert_eq!(
            catalog.template("bastion").unwrap().directory(),
            "bastion_v2"
        );
        assert!(catalog.template("Skyward").is_none());
        assert!(catalog.template("missing").is_none());
        assert!(catalog.ruleset("Deathmatch").is_none());
    }

    #[test]
    fn prefix_match_is_case_insensitive_and_first_wins() {
        let catalog = sample_catalog();
        let teams = vec![
            TeamTemplate::new("Red Team", TeamColor::Red),
            TeamTemplate::new("Blue Team", TeamColor::Blue),
        ];

        assert_eq!(
            catalog.match_team_by_prefix(&teams, "r").unwrap().name(),
            "Red Team"
        );
        assert_eq!(
            catalog.match_team_by_prefix(&teams, "R").unwrap().name(),
            "Red Team"
        );
        assert_eq!(
            catalog.match_team_by_prefix(&teams, "bl").unwrap().name(),
            "Blue Team"
        );
        assert!(catalog.match_team_by_prefix(&teams, "z").is_none());
        assert!(catalog.match_team_by_prefix(&teams, "").is_none());
    }
}

//! Factory functions for assembling a fully wired engine.

use crate::catalog::{Catalog, PlayfieldTemplate};
use crate::config::EngineConfig;
use crate::control::MatchController;
use crate::error::EngineResult;
use crate::events::EventBus;
use crate::host::EngineHost;
use crate::rotation::RotationQueue;
use crate::ruleset::{FirstListedSelector, RulesetLoader, RulesetSelector};
use crate::session::{ParticipantDirectory, SessionFactory};
use std::sync::Arc;

/// A fully wired engine: the controller, the directory it drives, and the
/// bus its events arrive on.
pub struct Engine {
    pub controller: Arc<MatchController>,
    pub directory: Arc<ParticipantDirectory>,
    pub events: EventBus,
}

/// Assembles an engine with the default first-listed ruleset selection
/// policy.
///
/// Loads the rotation from the configured resource (fatal if unreadable),
/// builds the catalog from `templates` and the injected loader, and wires
/// directory, provisioner, and controller onto one event bus.
///
/// # Arguments
///
/// * `config` - Engine configuration (directories, rotation, timers)
/// * `host` - Engine Host adapter supplying runtime capabilities
/// * `templates` - Playfield template entries for the catalog
/// * `loader` - Supplies ruleset definitions
/// * `factory` - Constructs concrete participant sessions
pub async fn create_engine(
    config: EngineConfig,
    host: Arc<dyn EngineHost>,
    templates: Vec<PlayfieldTemplate>,
    loader: &dyn RulesetLoader,
    factory: Arc<dyn SessionFactory>,
) -> EngineResult<Engine> {
    create_engine_with_selector(
        config,
        host,
        templates,
        loader,
        factory,
        Arc::new(FirstListedSelector),
    )
    .await
}

/// Assembles an engine with a custom ruleset selection policy.
pub async fn create_engine_with_selector(
    config: EngineConfig,
    host: Arc<dyn EngineHost>,
    templates: Vec<PlayfieldTemplate>,
    loader: &dyn RulesetLoader,
    factory: Arc<dyn SessionFactory>,
    selector: Arc<dyn RulesetSelector>,
) -> EngineResult<Engine> {
    let rotation = RotationQueue::load(&config.rotation_file).await?;
    let catalog = Catalog::new(templates, loader);
    let events = EventBus::new();
    let directory = Arc::new(ParticipantDirectory::new(
        host.clone(),
        factory,
        events.clone(),
    ));
    let controller = MatchController::new(
        config,
        host,
        catalog,
        rotation,
        directory.clone(),
        events.clone(),
        selector,
    );

    Ok(Engine {
        controller,
        directory,
        events,
    })
}

//! The lifecycle state machine tying every component together.

use super::state::{MatchState, MatchStatus};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, MatchEvent};
use crate::host::{EngineHost, EnvironmentHandle};
use crate::provision::EnvironmentProvisioner;
use crate::rotation::RotationQueue;
use crate::ruleset::{Ruleset, RulesetSelector};
use crate::session::ParticipantDirectory;
use crate::team::{TeamInstance, TeamTemplate};
use crate::types::{RoundId, RuntimeTeam};
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Drives all flow of match cycles.
///
/// Administrative transitions (`end_cycle`, `pre_match`) are owned by the
/// controller; gameplay-owned transitions (`match_start`, `match_end`) hand
/// control to and take it back from the active ruleset. Wrong-state
/// invocations of any transition are logged no-ops, which guards against
/// double-invocation without introducing heavier machinery.
///
/// The two timers (cycle grace window, start countdown) are deferred tasks:
/// the grace task runs the next selection and staging, the countdown task
/// starts play. A stale countdown is aborted whenever a new cycle begins.
pub struct MatchController {
    config: EngineConfig,
    host: Arc<dyn EngineHost>,
    catalog: Catalog,
    rotation: Mutex<RotationQueue>,
    provisioner: EnvironmentProvisioner,
    directory: Arc<ParticipantDirectory>,
    events: EventBus,
    selector: Arc<dyn RulesetSelector>,

    state: RwLock<MatchState>,
    active_ruleset: RwLock<Option<Arc<dyn Ruleset>>>,
    active_teams: RwLock<Vec<TeamInstance>>,
    current_environment: RwLock<Option<EnvironmentHandle>>,
    pending_countdown: std::sync::Mutex<Option<JoinHandle<()>>>,
    pending_cycle: std::sync::Mutex<Option<JoinHandle<()>>>,
    /// Self-handle for the deferred grace/countdown tasks.
    me: Weak<MatchController>,
}

impl MatchController {
    /// Creates a controller over the given collaborators. The rotation is
    /// expected to be loaded already; a controller cannot exist without
    /// one. Returned shared because the controller hands itself to its own
    /// deferred tasks.
    pub fn new(
        config: EngineConfig,
        host: Arc<dyn EngineHost>,
        catalog: Catalog,
        rotation: RotationQueue,
        directory: Arc<ParticipantDirectory>,
        events: EventBus,
        selector: Arc<dyn RulesetSelector>,
    ) -> Arc<Self> {
        let provisioner = EnvironmentProvisioner::new(
            host.clone(),
            config.templates_dir.clone(),
            config.instances_dir.clone(),
        );
        Arc::new_cyclic(|me| Self {
            config,
            host,
            catalog,
            rotation: Mutex::new(rotation),
            provisioner,
            directory,
            events,
            selector,
            state: RwLock::new(MatchState::new()),
            active_ruleset: RwLock::new(None),
            active_teams: RwLock::new(Vec::new()),
            current_environment: RwLock::new(None),
            pending_countdown: std::sync::Mutex::new(None),
            pending_cycle: std::sync::Mutex::new(None),
            me: me.clone(),
        })
    }

    /// Runs one administrative boundary: selects the next playfield and
    /// stages its round. Called at boot and by the grace-window task after
    /// every cycle.
    pub async fn next_round(&self) -> EngineResult<()> {
        self.end_cycle().await?;
        self.pre_match().await
    }

    /// Selects the next playfield and ruleset once a cycle is over.
    ///
    /// Records the current playfield as previous, advances the rotation
    /// (skipping names the catalog cannot resolve, and never repeating the
    /// previous playfield when the rotation offers an alternative), runs
    /// the ruleset selection step, resets per-round transient state, and
    /// enters `Starting`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if a full pass over the rotation
    /// yields no usable playfield.
    pub async fn end_cycle(&self) -> EngineResult<()> {
        {
            let state = self.state.read().await;
            if state.status != MatchStatus::Cycle && state.status != MatchStatus::None {
                warn!("end_cycle ignored: match status is {}", state.status);
                return Ok(());
            }
        }
        self.abort_pending_countdown();

        let previous = self.state.read().await.current_playfield.clone();

        // One full pass over the rotation. A playfield that only fails the
        // consecutive-repeat check is kept as a fallback so a pathological
        // rotation still cycles.
        let mut selected: Option<(String, Arc<dyn Ruleset>)> = None;
        let mut fallback: Option<(String, Arc<dyn Ruleset>)> = None;
        {
            let mut rotation = self.rotation.lock().await;
            let attempts = rotation.len();
            for _ in 0..attempts {
                // Take the entry under the cursor, then move the cursor on
                // for the following cycle.
                let name = rotation.current().to_string();
                rotation.advance();
                let Some(template) = self.catalog.template(&name) else {
                    warn!("Rotation names unknown playfield '{}', skipping", name);
                    continue;
                };

                let known: Vec<String> = template
                    .rulesets()
                    .iter()
                    .filter(|r| self.catalog.ruleset(r.as_str()).is_some())
                    .cloned()
                    .collect();
                if known.is_empty() {
                    warn!("Playfield '{}' has no loadable ruleset, skipping", name);
                    continue;
                }

                // Selection step: a multi-ruleset playfield defers to the
                // injected policy (e.g. the outcome of a vote).
                let chosen = self.selector.select(template, &known).to_string();
                let ruleset = self
                    .catalog
                    .ruleset(&chosen)
                    .expect("candidate filtered against catalog");

                if rotation.len() > 1 && previous.as_deref() == Some(name.as_str()) {
                    if fallback.is_none() {
                        fallback = Some((name, ruleset));
                    }
                    continue;
                }
                selected = Some((name, ruleset));
                break;
            }
        }

        let (next_playfield, ruleset) = match selected.or_else(|| {
            if let Some(f) = &fallback {
                warn!("Rotation offers no alternative to '{}'; repeating it", f.0);
            }
            fallback
        }) {
            Some(choice) => choice,
            None => {
                return Err(EngineError::Configuration(
                    "no usable playfield in rotation".to_string(),
                ))
            }
        };

        info!(
            "🗺️ Next up: '{}' running {}",
            next_playfield,
            ruleset.name()
        );

        // Reset per-round transient state before the new round is staged.
        self.active_teams.write().await.clear();
        *self.active_ruleset.write().await = Some(ruleset);

        let mut state = self.state.write().await;
        state.previous_playfield = state.current_playfield.take();
        state.current_playfield = Some(next_playfield);
        state.status = MatchStatus::Starting;
        Ok(())
    }

    /// Stages the selected round: fresh identifier, provisioned
    /// environment, everyone relocated as observers, previous instance
    /// reclaimed, countdown running.
    ///
    /// # Errors
    ///
    /// [`EngineError::Provisioning`] if the environment cannot be
    /// materialized; the round is unrecoverable and the caller must treat
    /// this as fatal.
    pub async fn pre_match(&self) -> EngineResult<()> {
        let (playfield, previous_round) = {
            let state = self.state.read().await;
            if state.status != MatchStatus::Starting {
                warn!("pre_match ignored: match status is {}", state.status);
                return Ok(());
            }
            let playfield = state.current_playfield.clone().ok_or_else(|| {
                EngineError::Configuration("no playfield selected before pre_match".to_string())
            })?;
            (playfield, state.round_id)
        };

        let template = self.catalog.template(&playfield).ok_or_else(|| {
            EngineError::Configuration(format!("playfield '{playfield}' vanished from catalog"))
        })?;

        let round = self.provisioner.generate_round_id(previous_round);
        let environment = self.provisioner.provision(template, round).await?;

        {
            let mut state = self.state.write().await;
            state.previous_round = state.round_id;
            state.round_id = Some(round);
        }

        // Everyone enters the new environment as an observer; teams are
        // assigned only once play begins.
        self.directory.demote_all().await;
        for participant in self.directory.participants().await {
            if let Err(e) = self.host.relocate(participant, &environment).await {
                warn!("Failed to relocate {} into round {}: {e}", participant, round);
            }
        }

        let previous_environment = self.current_environment.write().await.replace(environment);
        if let Some(previous) = previous_round {
            self.provisioner.reclaim(previous).await;
        } else if let Some(stale) = previous_environment {
            warn!("Replacing environment {} with no round on record", stale.instance_id);
        }

        info!(
            "⏳ Round {} staged on '{}'; starting in {}s",
            round, playfield, self.config.countdown_secs
        );

        let countdown = self.config.countdown();
        if let Some(controller) = self.me.upgrade() {
            let handle = tokio::spawn(async move {
                tokio::time::sleep(countdown).await;
                controller.match_start().await;
            });
            self.replace_pending_countdown(handle);
        }
        Ok(())
    }

    /// Begins play: instantiates and binds the round's teams, then hands
    /// control to the active ruleset. Round end is triggered externally by
    /// the ruleset's win conditions, never from here.
    pub async fn match_start(&self) {
        {
            let mut state = self.state.write().await;
            if state.status != MatchStatus::Starting {
                warn!("match_start ignored: match status is {}", state.status);
                return;
            }
            if state.round_id.is_none() {
                warn!("match_start ignored: no round has been staged");
                return;
            }
            state.status = MatchStatus::Playing;
        }

        let Some(ruleset) = self.active_ruleset.read().await.clone() else {
            error!("match_start reached with no active ruleset");
            return;
        };

        // The runtime team objects exist only now that the round's
        // environment does.
        let teams: Vec<TeamInstance> = ruleset
            .teams()
            .iter()
            .map(|template| {
                let mut instance = template.instantiate();
                instance.bind(RuntimeTeam::new());
                instance
            })
            .collect();
        *self.active_teams.write().await = teams.clone();

        ruleset.on_round_start(&self.directory, &teams).await;

        let state = self.state.read().await;
        let playfield = state.current_playfield.clone().unwrap_or_default();
        let round_id = state.round_id.expect("round staged before match_start");
        info!("🎮 Round {} now playing on '{}'", round_id, playfield);
        self.events.emit(MatchEvent::RoundStarted {
            playfield,
            ruleset: ruleset.name().to_string(),
            round_id,
        });
    }

    /// Ends the active round after the ruleset has facilitated its end:
    /// everyone becomes an observer, round state is cleaned up, and the
    /// cycle window begins.
    pub async fn match_end(&self) {
        {
            let state = self.state.read().await;
            if state.status != MatchStatus::Playing {
                warn!("match_end ignored: match status is {}", state.status);
                return;
            }
        }

        self.directory.demote_all().await;

        let ruleset = self.active_ruleset.read().await.clone();
        if let Some(ruleset) = ruleset {
            ruleset.on_round_end(&self.directory).await;
        }
        self.active_teams.write().await.clear();

        {
            let state = self.state.read().await;
            if let Some(round_id) = state.round_id {
                info!(
                    "🏁 Round {} over on '{}'",
                    round_id,
                    state.current_playfield.as_deref().unwrap_or("?")
                );
                self.events.emit(MatchEvent::RoundEnded {
                    playfield: state.current_playfield.clone().unwrap_or_default(),
                    round_id,
                });
            }
        }

        self.start_cycle().await;
    }

    /// Opens the cycle window: a bounded grace period for end-of-round
    /// spectacle, after which the next round is selected and staged.
    pub async fn start_cycle(&self) {
        {
            let mut state = self.state.write().await;
            if state.status != MatchStatus::Playing {
                warn!("start_cycle ignored: match status is {}", state.status);
                return;
            }
            state.status = MatchStatus::Cycle;
        }

        self.directory.demote_all().await;

        let grace = self.config.cycle_grace();
        if let Some(controller) = self.me.upgrade() {
            let handle = tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                if let Err(e) = controller.next_round().await {
                    // A round without valid infrastructure must not proceed.
                    error!("❌ Fatal error advancing to next round: {e}");
                    std::process::exit(1);
                }
            });
            let stale = self
                .pending_cycle
                .lock()
                .expect("cycle slot poisoned")
                .replace(handle);
            if let Some(stale) = stale {
                stale.abort();
            }
        }
    }

    /// Current stage of the match cycle.
    pub async fn status(&self) -> MatchStatus {
        self.state.read().await.status
    }

    /// Snapshot of the full state record.
    pub async fn state(&self) -> MatchState {
        self.state.read().await.clone()
    }

    /// The environment of the current round. Warns and returns `None`
    /// when no round has been established.
    pub async fn current_environment(&self) -> Option<EnvironmentHandle> {
        if self.state.read().await.status == MatchStatus::None {
            warn!("No round established; there is no current environment");
            return None;
        }
        self.current_environment.read().await.clone()
    }

    /// The active round's team instances.
    pub async fn active_teams(&self) -> Vec<TeamInstance> {
        self.active_teams.read().await.clone()
    }

    /// Name of the ruleset selected for the current round, if any.
    pub async fn active_ruleset_name(&self) -> Option<String> {
        self.active_ruleset
            .read()
            .await
            .as_ref()
            .map(|r| r.name().to_string())
    }

    /// Finds a team of the active ruleset from a complete or incomplete
    /// name (case-insensitive prefix, first match wins).
    pub async fn match_team(&self, preference: &str) -> Option<TeamTemplate> {
        let ruleset = self.active_ruleset.read().await.clone()?;
        let teams = ruleset.teams();
        self.catalog
            .match_team_by_prefix(&teams, preference)
            .cloned()
    }

    /// The participant directory this controller drives.
    pub fn directory(&self) -> &Arc<ParticipantDirectory> {
        &self.directory
    }

    /// Rounds staged and not yet reclaimed, including the one in play.
    pub fn active_rounds(&self) -> std::collections::HashSet<RoundId> {
        self.provisioner.active_rounds()
    }

    /// Aborts pending timers and reclaims the live instance. Called once
    /// on graceful shutdown; the disposable instance would otherwise leak
    /// to disk.
    pub async fn shutdown_cleanup(&self) {
        self.abort_pending_countdown();
        if let Some(handle) = self.pending_cycle.lock().expect("cycle slot poisoned").take() {
            handle.abort();
        }
        let round = self.state.read().await.round_id;
        if let Some(round) = round {
            info!("🧹 Reclaiming instance of round {} before shutdown", round);
            self.provisioner.reclaim(round).await;
        }
    }

    fn replace_pending_countdown(&self, handle: JoinHandle<()>) {
        let stale = self
            .pending_countdown
            .lock()
            .expect("countdown slot poisoned")
            .replace(handle);
        if let Some(stale) = stale {
            stale.abort();
        }
    }

    fn abort_pending_countdown(&self) {
        if let Some(handle) = self
            .pending_countdown
            .lock()
            .expect("countdown slot poisoned")
            .take()
        {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for MatchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

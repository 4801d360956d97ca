//! Directory of connected participants and the pairwise visibility engine.
//!
//! The directory tracks every live session, moves participants between the
//! competing and observing roles, and keeps each participant's view of the
//! others consistent with those roles. It uses async-safe data structures
//! so host callbacks can reach it concurrently.
//!
//! # Visibility rule
//!
//! A participant sees another unless the first is competing and the second
//! is observing: competitors see only competitors, observers see everyone.
//! Each role change drives an O(n) recomputation from the changed session's
//! perspective, updating both directions of every affected pair, so the
//! final relation is always symmetric in the sense of the rule. Desired
//! state is diffed against the state last applied to the host, which makes
//! recomputation idempotent: re-running it with nothing changed produces
//! zero host calls.

use super::{ParticipantSession, SessionFactory};
use crate::events::{EventBus, MatchEvent};
use crate::host::EngineHost;
use crate::types::{ParticipantId, TeamId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Host-facing side effects produced by one visibility recomputation,
/// applied after the session lock is released.
enum VisibilityOp {
    Show {
        observer: ParticipantId,
        target: ParticipantId,
    },
    Hide {
        observer: ParticipantId,
        target: ParticipantId,
    },
    Collide {
        participant: ParticipantId,
        collidable: bool,
    },
}

/// Registry of connected participants, keyed by stable identity.
///
/// Sessions are exclusively owned by the directory: no other component may
/// construct or destroy them. Insertions happen on connect, removals on
/// disconnect, and every team (re)assignment flows through
/// [`ParticipantDirectory::assign_team`] so the visibility relation is
/// recomputed exactly once per change.
pub struct ParticipantDirectory {
    sessions: Arc<RwLock<HashMap<ParticipantId, ParticipantSession>>>,
    host: Arc<dyn EngineHost>,
    factory: Arc<dyn SessionFactory>,
    events: EventBus,
}

impl ParticipantDirectory {
    /// Creates an empty directory.
    ///
    /// # Arguments
    ///
    /// * `host` - Engine Host used for show/hide/collision side effects
    /// * `factory` - Injected constructor for concrete sessions
    /// * `events` - Bus carrying joined/left/eliminated events
    pub fn new(
        host: Arc<dyn EngineHost>,
        factory: Arc<dyn SessionFactory>,
        events: EventBus,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            host,
            factory,
            events,
        }
    }

    /// Registers a session for a newly connected participant and brings its
    /// visibility in line with the observing role it starts in.
    ///
    /// Re-crafting an already-registered identity is a logged no-op.
    pub async fn craft_session(&self, identity: ParticipantId) {
        {
            let mut sessions = self.sessions.write().await;
            if sessions.contains_key(&identity) {
                warn!("Session for {} already exists, not re-crafting", identity);
                return;
            }
            let session = self.factory.craft(identity);
            info!("🔗 Participant {} connected ({})", identity, session.display_name());
            sessions.insert(identity, session);
        }

        self.recompute_visibility(identity).await;
        self.events.emit(MatchEvent::ParticipantJoined { identity });
    }

    /// Removes the session of a disconnected participant.
    ///
    /// The departed identity is pruned from every remaining session's
    /// applied-visibility bookkeeping; no host calls are issued because the
    /// host has already dropped the participant.
    pub async fn destroy_session(&self, identity: ParticipantId) {
        let removed = {
            let mut sessions = self.sessions.write().await;
            let removed = sessions.remove(&identity);
            if removed.is_some() {
                for session in sessions.values_mut() {
                    session.hidden.remove(&identity);
                }
            }
            removed
        };

        match removed {
            Some(session) => {
                info!("❌ Participant {} disconnected ({})", identity, session.display_name());
                self.events.emit(MatchEvent::ParticipantLeft { identity });
            }
            None => warn!("No session to destroy for {}", identity),
        }
    }

    /// Assigns `identity` to a team, or to the observing role when `team`
    /// is `None`, and recomputes visibility from its perspective.
    ///
    /// Unknown identities are a logged no-op.
    pub async fn assign_team(&self, identity: ParticipantId, team: Option<TeamId>) {
        {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&identity) {
                Some(session) => {
                    debug!("Participant {} now on team {:?}", identity, team);
                    session.set_current_team(team);
                }
                None => {
                    warn!("Cannot assign team: no session for {}", identity);
                    return;
                }
            }
        }

        self.recompute_visibility(identity).await;
    }

    /// Marks whether the participant has opted in to play upcoming rounds.
    pub async fn set_joined(&self, identity: ParticipantId, joined: bool) {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&identity) {
            Some(session) => session.set_joined(joined),
            None => warn!("Cannot set joined flag: no session for {}", identity),
        }
    }

    /// Knocks a competing participant out of the round: demotes them to the
    /// observing role and emits a participant-eliminated event.
    pub async fn eliminate(&self, identity: ParticipantId) {
        self.assign_team(identity, None).await;
        self.events.emit(MatchEvent::ParticipantEliminated { identity });
    }

    /// Moves every competing participant to the observing role, one session
    /// at a time so each recomputation reads the just-updated roles.
    pub async fn demote_all(&self) {
        let competing: Vec<ParticipantId> = {
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .filter(|s| s.is_competing())
                .map(|s| s.identity())
                .collect()
        };

        for identity in competing {
            self.assign_team(identity, None).await;
        }
    }

    /// Derived roster index: the identities currently holding `team`.
    /// Recomputed on demand from session state rather than maintained as a
    /// second mutable pointer set.
    pub async fn roster(&self, team: &TeamId) -> HashSet<ParticipantId> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|s| s.current_team() == Some(team))
            .map(|s| s.identity())
            .collect()
    }

    /// All registered identities.
    pub async fn participants(&self) -> Vec<ParticipantId> {
        let sessions = self.sessions.read().await;
        sessions.keys().copied().collect()
    }

    /// Identities that have opted in to play.
    pub async fn joined_participants(&self) -> Vec<ParticipantId> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|s| s.is_joined())
            .map(|s| s.identity())
            .collect()
    }

    /// Number of registered sessions.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Whether `identity` is competing, or `None` if not registered.
    pub async fn is_competing(&self, identity: ParticipantId) -> Option<bool> {
        let sessions = self.sessions.read().await;
        sessions.get(&identity).map(|s| s.is_competing())
    }

    /// The team currently held by `identity`, if registered and competing.
    pub async fn current_team(&self, identity: ParticipantId) -> Option<TeamId> {
        let sessions = self.sessions.read().await;
        sessions.get(&identity).and_then(|s| s.current_team().cloned())
    }

    /// Whether `observer` currently sees `target`, or `None` if the
    /// observer is not registered.
    pub async fn sees(&self, observer: ParticipantId, target: ParticipantId) -> Option<bool> {
        let sessions = self.sessions.read().await;
        sessions.get(&observer).map(|s| s.sees(target))
    }

    /// Display name of a registered participant.
    pub async fn display_name(&self, identity: ParticipantId) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions.get(&identity).map(|s| s.display_name().to_string())
    }

    /// Sends a chat-level message to everyone registered.
    pub async fn broadcast(&self, message: &str) {
        let recipients = self.participants().await;
        let count = recipients.len();
        for identity in recipients {
            self.host.send_message(identity, message).await;
        }
        debug!("📡 Broadcast message to {} participant(s)", count);
    }

    /// Recomputes visibility from `identity`'s perspective against every
    /// other registered session, both directions per pair, and applies only
    /// the host calls whose state actually changed.
    pub async fn recompute_visibility(&self, identity: ParticipantId) {
        let ops = {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.get(&identity) else {
                warn!("Cannot recompute visibility: no session for {}", identity);
                return;
            };
            let competing = session.is_competing();
            let others: Vec<(ParticipantId, bool)> = sessions
                .values()
                .filter(|s| s.identity() != identity)
                .map(|s| (s.identity(), s.is_competing()))
                .collect();

            let mut ops = Vec::new();

            // Competitors are solid; observers pass through the world.
            let session = sessions.get_mut(&identity).expect("session present above");
            if session.collidable != Some(competing) {
                session.collidable = Some(competing);
                ops.push(VisibilityOp::Collide {
                    participant: identity,
                    collidable: competing,
                });
            }

            for (other, other_competing) in others {
                // One sees the other unless the viewer is competing and the
                // viewed is observing.
                let self_sees_other = !(competing && !other_competing);
                let other_sees_self = !(other_competing && !competing);

                let session = sessions.get_mut(&identity).expect("session present above");
                Self::apply_direction(session, identity, other, self_sees_other, &mut ops);

                let other_session = sessions.get_mut(&other).expect("listed above");
                Self::apply_direction(other_session, other, identity, other_sees_self, &mut ops);
            }

            ops
        };

        for op in ops {
            match op {
                VisibilityOp::Show { observer, target } => self.host.show(observer, target).await,
                VisibilityOp::Hide { observer, target } => self.host.hide(observer, target).await,
                VisibilityOp::Collide {
                    participant,
                    collidable,
                } => self.host.set_collidable(participant, collidable).await,
            }
        }
    }

    /// Updates one direction of one pair, recording a host call only when
    /// the applied state differs from the desired state.
    fn apply_direction(
        observer_session: &mut ParticipantSession,
        observer: ParticipantId,
        target: ParticipantId,
        visible: bool,
        ops: &mut Vec<VisibilityOp>,
    ) {
        if visible {
            if observer_session.hidden.remove(&target) {
                ops.push(VisibilityOp::Show { observer, target });
            }
        } else if observer_session.hidden.insert(target) {
            ops.push(VisibilityOp::Hide { observer, target });
        }
    }
}

impl std::fmt::Debug for ParticipantDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantDirectory").finish_non_exhaustive()
    }
}

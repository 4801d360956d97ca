//! Produced events and the broadcast bus that carries them.
//!
//! The engine emits a small set of lifecycle events consumed by external
//! collaborators (rulesets, UI layers, recorders). Delivery uses a tokio
//! broadcast channel: every subscriber gets every event, and emission never
//! blocks the simulation flow.

use crate::types::{ParticipantId, RoundId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Lifecycle events produced by the engine.
///
/// Events carry identifiers rather than session references; consumers
/// resolve live state through the directory if they need more than the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A round transitioned into active play.
    RoundStarted {
        playfield: String,
        ruleset: String,
        round_id: RoundId,
    },
    /// The active round ended and cleanup began.
    RoundEnded {
        playfield: String,
        round_id: RoundId,
    },
    /// A participant session was registered.
    ParticipantJoined { identity: ParticipantId },
    /// A participant session was destroyed.
    ParticipantLeft { identity: ParticipantId },
    /// A competing participant was knocked out of the round.
    ParticipantEliminated { identity: ParticipantId },
}

/// Broadcast bus for [`MatchEvent`]s.
///
/// Cheap to clone; all clones feed the same channel. Emission with no
/// live subscribers is normal during startup and is logged at debug only.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MatchEvent>,
}

impl EventBus {
    /// Creates a bus with a buffer large enough that slow consumers do not
    /// stall round progression.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self { sender }
    }

    /// Creates a new receiver for engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to every current subscriber.
    pub fn emit(&self, event: MatchEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::debug!("Event emitted with no subscribers: {:?}", e);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParticipantId;

    #[test]
    fn events_round_trip_through_json() {
        let event = MatchEvent::RoundStarted {
            playfield: "skyward".to_string(),
            ruleset: "Deathmatch".to_string(),
            round_id: RoundId(48213),
        };

        let json = serde_json::to_string(&event).expect("event serializes");
        let back: MatchEvent = serde_json::from_str(&json).expect("event deserializes");
        assert!(matches!(
            back,
            MatchEvent::RoundStarted { round_id: RoundId(48213), .. }
        ));

        let identity = ParticipantId::new();
        let event = MatchEvent::ParticipantEliminated { identity };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(&identity.to_string()));
    }

    #[tokio::test]
    async fn every_subscriber_receives_every_event() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let identity = ParticipantId::new();
        bus.emit(MatchEvent::ParticipantJoined { identity });

        for rx in [&mut first, &mut second] {
            assert!(matches!(
                rx.try_recv().unwrap(),
                MatchEvent::ParticipantJoined { identity: id } if id == identity
            ));
        }
    }
}

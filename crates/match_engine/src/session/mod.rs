//! Participant sessions and the directory that owns them.
//!
//! A session exists exactly as long as its connection: crafted on connect,
//! destroyed on disconnect. The directory is the only component allowed to
//! construct or destroy sessions, and the visibility engine lives behind
//! its mutation methods so the pairwise relation can never drift from team
//! membership.

pub mod directory;
pub mod participant;

pub use directory::ParticipantDirectory;
pub use participant::ParticipantSession;

use crate::types::ParticipantId;

/// Constructs the concrete session for a newly connected participant.
///
/// Injected at directory construction so the embedding game decides what a
/// fresh session looks like (display name, default opt-in state) without
/// subclassing anything in the core.
pub trait SessionFactory: Send + Sync {
    fn craft(&self, identity: ParticipantId) -> ParticipantSession;
}

/// Factory producing plain sessions named after their identity.
#[derive(Debug, Default)]
pub struct DefaultSessionFactory;

impl SessionFactory for DefaultSessionFactory {
    fn craft(&self, identity: ParticipantId) -> ParticipantSession {
        ParticipantSession::new(identity, identity.to_string())
    }
}

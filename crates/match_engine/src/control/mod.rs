//! Match lifecycle control.
//!
//! The controller drives all flow of match cycles: it owns the status
//! record, selects what plays next, provisions and reclaims environments,
//! and moves participants between roles at round boundaries. In-round
//! behavior belongs to the active ruleset, never to the controller.

mod controller;
mod state;

pub use controller::MatchController;
pub use state::{MatchState, MatchStatus};

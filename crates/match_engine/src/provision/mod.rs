//! Ephemeral environment provisioning.
//!
//! Every round plays on a disposable copy of a playfield template. This
//! module owns the whole instance lifecycle: staging the copy under a
//! collision-avoiding round identifier, creating the runtime environment
//! through the Engine Host, and tearing both down when the round is over.

mod fsops;
mod provisioner;

pub use provisioner::EnvironmentProvisioner;

//! Session lifecycle: open a remote session record, heartbeat its duration,
//! and send one final update when the host is hidden.

mod controller;
mod periodic;

pub use controller::{Capabilities, Phase, SessionController, Visibility};
pub use periodic::PeriodicHandle;

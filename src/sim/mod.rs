//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-tick driven only (time enters as an explicit clock value)
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod firefly;
pub mod net;
pub mod respawn;
pub mod state;
pub mod tick;

pub use firefly::Firefly;
pub use net::{NetCast, NetPhase};
pub use respawn::{PendingRespawn, RespawnQueue};
pub use state::GameState;
pub use tick::{ClickOutcome, FrameInput, FrameReport, click, resolve_capture, tick};

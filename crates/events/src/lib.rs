//! Event system for SoloPreneur Lens
//!
//! Orchestrators publish feature lifecycle and board-room transcript
//! events here; the consuming shell subscribes to drive its UI state.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;

//! RAII resource holders.
//!
//! - [`FeatureGuard`] keeps one call per feature in flight
//! - [`AudioSlot`] keeps one narration playing

mod audio_slot;
mod feature_guard;

pub use audio_slot::{AudioSlot, Clip, Playback};
pub use feature_guard::{Feature, FeatureGuard, FeatureGuards, FeaturePermit};

//! Prompt orchestration for SoloPreneur Lens.
//!
//! [`services`] holds one orchestrator per feature; [`Studio`] wraps them
//! with per-feature guards, topic generations and the live board room.

pub mod board_room;
pub mod dispatch;
pub mod error;
pub mod layout;
pub mod prompts;
pub mod report;
pub mod resources;
pub mod schemas;
pub mod services;
pub mod store;
pub mod studio;

pub use board_room::BoardRoom;
pub use dispatch::Dispatch;
pub use error::{OrchestratorError, Result};
pub use layout::{JitterSource, NoJitter, RandJitter};
pub use report::StrategyReport;
pub use resources::{AudioSlot, Clip, Feature, FeatureGuard, FeatureGuards, FeaturePermit, Playback};
pub use store::LensStore;
pub use studio::{SharedGeneration, Studio, TopicArtifacts};

//! Event types for the SoloPreneur Lens event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Topic events
    /// A new topic generation started; earlier in-flight results are stale
    #[serde(rename = "topic.started")]
    TopicStarted { generation: u64, topic: String },

    // Feature events
    /// A feature orchestrator call was dispatched
    #[serde(rename = "feature.started")]
    FeatureStarted { feature: String, generation: u64 },

    /// A feature orchestrator call produced its record
    #[serde(rename = "feature.completed")]
    FeatureCompleted { feature: String, generation: u64 },

    /// A feature orchestrator call failed
    #[serde(rename = "feature.failed")]
    FeatureFailed {
        feature: String,
        message: String,
        /// Backend rejected the credential; the shell should re-authenticate
        authorization: bool,
    },

    /// Invocation ignored because the same feature is already in flight
    #[serde(rename = "feature.skipped")]
    FeatureSkipped { feature: String },

    /// Result arrived after a newer topic started and was discarded
    #[serde(rename = "feature.superseded")]
    FeatureSuperseded { feature: String, generation: u64 },

    // Board room events
    /// A message was appended to a board meeting transcript
    #[serde(rename = "board.message_appended")]
    BoardMessageAppended {
        meeting_id: Uuid,
        message: BoardMessageData,
        /// True for the founder's optimistic append, false once confirmed
        tentative: bool,
    },

    // Audio events
    #[serde(rename = "audio.started")]
    AudioStarted { duration_ms: u64 },

    #[serde(rename = "audio.stopped")]
    AudioStopped,
}

/// Data for board message events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMessageData {
    /// Message role (User, CFO, CMO, CTO, System)
    pub role: String,
    pub name: String,
    pub text: String,
}

impl Event {
    /// Get the feature name associated with this event, if any
    pub fn feature(&self) -> Option<&str> {
        match self {
            Event::FeatureStarted { feature, .. } => Some(feature),
            Event::FeatureCompleted { feature, .. } => Some(feature),
            Event::FeatureFailed { feature, .. } => Some(feature),
            Event::FeatureSkipped { feature } => Some(feature),
            Event::FeatureSuperseded { feature, .. } => Some(feature),
            Event::TopicStarted { .. }
            | Event::BoardMessageAppended { .. }
            | Event::AudioStarted { .. }
            | Event::AudioStopped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_envelope_creation() {
        let event = Event::TopicStarted {
            generation: 1,
            topic: "Plant care".to_string(),
        };
        let envelope = EventEnvelope::new(event);

        assert!(!envelope.id.is_nil());
        assert!(envelope.timestamp <= Utc::now());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::FeatureFailed {
            feature: "risk".to_string(),
            message: "Requested entity was not found.".to_string(),
            authorization: true,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("feature.failed"));
        assert!(json.contains("\"authorization\":true"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"feature.skipped","feature":"strategy_map"}"#;
        let event: Event = serde_json::from_str(json).unwrap();

        match event {
            Event::FeatureSkipped { feature } => assert_eq!(feature, "strategy_map"),
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_feature() {
        let event = Event::FeatureCompleted {
            feature: "pitch".to_string(),
            generation: 3,
        };
        assert_eq!(event.feature(), Some("pitch"));

        assert_eq!(Event::AudioStopped.feature(), None);
    }

    #[test]
    fn test_board_message_event() {
        let event = Event::BoardMessageAppended {
            meeting_id: Uuid::new_v4(),
            message: BoardMessageData {
                role: "User".to_string(),
                name: "You".to_string(),
                text: "Should I raise?".to_string(),
            },
            tentative: true,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("board.message_appended"));
        assert!(json.contains("\"tentative\":true"));
    }
}

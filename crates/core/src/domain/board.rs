use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of advisors seated at every meeting
pub const BOARD_SIZE: usize = 3;

/// Fixed seat on the advisory board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum AdvisorRole {
    #[serde(rename = "CFO")]
    Cfo,
    #[serde(rename = "CMO")]
    Cmo,
    #[serde(rename = "CTO")]
    Cto,
}

/// Static persona backing an advisor seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub name: &'static str,
    pub avatar_color: &'static str,
    pub temperament: &'static str,
}

impl AdvisorRole {
    pub const ALL: [Self; BOARD_SIZE] = [Self::Cfo, Self::Cmo, Self::Cto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cfo => "CFO",
            Self::Cmo => "CMO",
            Self::Cto => "CTO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CFO" => Some(Self::Cfo),
            "CMO" => Some(Self::Cmo),
            "CTO" => Some(Self::Cto),
            _ => None,
        }
    }

    pub fn persona(&self) -> Persona {
        match self {
            Self::Cfo => Persona {
                name: "Marcus",
                avatar_color: "#10b981",
                temperament: "Frugal, risk-averse, obsessed with margins and burn rate. Skeptical of the CMO's spending.",
            },
            Self::Cmo => Persona {
                name: "Sarah",
                avatar_color: "#ec4899",
                temperament: "Viral-obsessed, focuses on brand, community, and hype. Optimistic but frustrated by the CFO's constraints.",
            },
            Self::Cto => Persona {
                name: "Alex",
                avatar_color: "#3b82f6",
                temperament: "Pragmatic, focuses on build time, technical feasibility, and scalability. Logical and focused on execution.",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Verdict {
    Approve,
    Reject,
    #[default]
    Pivot,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Pivot => "Pivot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "pivot" => Some(Self::Pivot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Advisor {
    pub role: AdvisorRole,
    pub name: String,
    /// Hex color such as `#10b981`
    pub avatar_color: String,
    pub advice: String,
    pub concern: String,
    pub verdict: Verdict,
}

/// Author of a board-room chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum MessageRole {
    User,
    #[serde(rename = "CFO")]
    Cfo,
    #[serde(rename = "CMO")]
    Cmo,
    #[serde(rename = "CTO")]
    Cto,
    System,
}

impl From<AdvisorRole> for MessageRole {
    fn from(role: AdvisorRole) -> Self {
        match role {
            AdvisorRole::Cfo => Self::Cfo,
            AdvisorRole::Cmo => Self::Cmo,
            AdvisorRole::Cto => Self::Cto,
        }
    }
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Cfo => "CFO",
            Self::Cmo => "CMO",
            Self::Cto => "CTO",
            Self::System => "System",
        }
    }

    pub fn is_advisor(&self) -> bool {
        matches!(self, Self::Cfo | Self::Cmo | Self::Cto)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BoardMessage {
    pub role: MessageRole,
    pub name: String,
    pub text: String,
    /// Milliseconds since the Unix epoch, stamped locally
    pub timestamp: i64,
}

impl BoardMessage {
    /// A founder question, stamped now
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            name: "You".to_string(),
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// An advisor reply, stamped now
    pub fn advisor(role: AdvisorRole, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Append-only, chronologically ordered board-room transcript.
///
/// Entries can be added but never removed, edited or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct ChatHistory(Vec<BoardMessage>);

impl ChatHistory {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, message: BoardMessage) {
        self.0.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = BoardMessage>) {
        self.0.extend(messages);
    }

    pub fn as_slice(&self) -> &[BoardMessage] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoardMessage> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&BoardMessage> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a BoardMessage;
    type IntoIter = std::slice::Iter<'a, BoardMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct BoardMeeting {
    /// Identifies this meeting across chat round trips
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Exactly one advisor per [`AdvisorRole`], in CFO, CMO, CTO order
    pub advisors: Vec<Advisor>,
    /// One-sentence summary of the conflict
    pub synthesis: String,
    #[serde(default)]
    pub chat_history: ChatHistory,
}

impl BoardMeeting {
    pub fn new(advisors: Vec<Advisor>, synthesis: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            advisors,
            synthesis: synthesis.into(),
            chat_history: ChatHistory::new(),
        }
    }

    pub fn advisor(&self, role: AdvisorRole) -> Option<&Advisor> {
        self.advisors.iter().find(|a| a.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&AdvisorRole::Cfo).unwrap(), "\"CFO\"");
        let role: MessageRole = serde_json::from_str("\"CTO\"").unwrap();
        assert_eq!(role, MessageRole::Cto);
        assert!(role.is_advisor());
        assert!(!MessageRole::User.is_advisor());
    }

    #[test]
    fn test_chat_history_appends_in_order() {
        let mut history = ChatHistory::new();
        history.push(BoardMessage::user("Should I raise?"));
        history.extend(vec![
            BoardMessage::advisor(AdvisorRole::Cfo, "Marcus", "No."),
            BoardMessage::advisor(AdvisorRole::Cmo, "Sarah", "Yes!"),
        ]);

        let roles: Vec<MessageRole> = history.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Cfo, MessageRole::Cmo]
        );
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_chat_history_serializes_as_array() {
        let mut history = ChatHistory::new();
        history.push(BoardMessage::user("hi"));

        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "User");
        assert_eq!(json[0]["name"], "You");
    }

    #[test]
    fn test_meeting_deserializes_without_id_or_history() {
        let json = r##"{
            "advisors": [],
            "synthesis": "They disagree."
        }"##;
        let meeting: BoardMeeting = serde_json::from_str(json).unwrap();
        assert!(meeting.chat_history.is_empty());
        assert_eq!(meeting.synthesis, "They disagree.");
    }

    #[test]
    fn test_personas_are_fixed() {
        assert_eq!(AdvisorRole::Cfo.persona().name, "Marcus");
        assert_eq!(AdvisorRole::Cmo.persona().name, "Sarah");
        assert_eq!(AdvisorRole::Cto.persona().name, "Alex");
    }
}

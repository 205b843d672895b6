//! Advisory board: the initial debate and follow-up questions.

use std::sync::OnceLock;

use gemini::{ModelGateway, StructuredRequest};
use lens_core::{
    Advisor, AdvisorRole, BoardMeeting, BoardMessage, RequestConfiguration, Verdict,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::normalize::{decode, non_blank, require_text, text_or_empty};
use crate::error::{OrchestratorError, Result};
use crate::{prompts, schemas};

/// Most advisors that answer a single question
pub const MAX_REPLIES: usize = 2;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMeeting {
    advisors: Option<Vec<RawAdvisor>>,
    synthesis: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawAdvisor {
    role: Option<String>,
    name: Option<String>,
    avatar_color: Option<String>,
    advice: Option<String>,
    concern: Option<String>,
    verdict: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReplies {
    messages: Option<Vec<RawReply>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReply {
    role: Option<String>,
    name: Option<String>,
    text: Option<String>,
}

/// Advisor stance sent as conversation context
#[derive(Serialize)]
struct Stance<'a> {
    role: &'a str,
    stance: &'a str,
}

fn hex_color() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"))
}

impl RawAdvisor {
    fn role(&self) -> Option<AdvisorRole> {
        self.role.as_deref().and_then(AdvisorRole::parse)
    }

    fn into_advisor(self, role: AdvisorRole) -> Advisor {
        let persona = role.persona();
        let avatar_color = non_blank(self.avatar_color)
            .filter(|c| hex_color().is_match(c))
            .unwrap_or_else(|| persona.avatar_color.to_string());

        Advisor {
            role,
            name: non_blank(self.name).unwrap_or_else(|| persona.name.to_string()),
            avatar_color,
            advice: text_or_empty(self.advice),
            concern: text_or_empty(self.concern),
            verdict: self
                .verdict
                .as_deref()
                .and_then(Verdict::parse)
                .unwrap_or_default(),
        }
    }
}

/// Seat for a role the model left out
fn placeholder(role: AdvisorRole) -> Advisor {
    let persona = role.persona();
    Advisor {
        role,
        name: persona.name.to_string(),
        avatar_color: persona.avatar_color.to_string(),
        advice: String::new(),
        concern: String::new(),
        verdict: Verdict::default(),
    }
}

/// One advisor per role in fixed order; the first entry for a role wins
fn seat_advisors(raw: Vec<RawAdvisor>) -> Vec<Advisor> {
    let mut raw: Vec<Option<RawAdvisor>> = raw.into_iter().map(Some).collect();

    AdvisorRole::ALL
        .iter()
        .map(|&role| {
            let found = raw
                .iter_mut()
                .find(|slot| slot.as_ref().and_then(RawAdvisor::role) == Some(role))
                .and_then(Option::take);

            match found {
                Some(advisor) => advisor.into_advisor(role),
                None => {
                    warn!(role = role.as_str(), "Board reply missing advisor, seating persona");
                    placeholder(role)
                }
            }
        })
        .collect()
}

pub async fn convene_board<G>(gateway: &G, config: &RequestConfiguration) -> Result<BoardMeeting>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let request = StructuredRequest::new(
        prompts::board_meeting_prompt(config.topic(), config.stage),
        schemas::board_meeting_schema(),
    );
    let response = gateway.generate_structured(request).await?;
    let raw: RawMeeting = decode(response.value, "board meeting")?;

    let meeting = BoardMeeting::new(
        seat_advisors(raw.advisors.unwrap_or_default()),
        text_or_empty(raw.synthesis),
    );

    info!(meeting_id = %meeting.id, "Board convened");
    Ok(meeting)
}

/// Replies from one or two advisors to a founder question.
///
/// Only the new messages are returned; appending them to the transcript
/// is the caller's job.
pub async fn ask_board<G>(
    gateway: &G,
    meeting: &BoardMeeting,
    question: &str,
) -> Result<Vec<BoardMessage>>
where
    G: ModelGateway + ?Sized,
{
    let question = require_text(question, "Please enter a question for the board.")?;

    let stances: Vec<Stance<'_>> = meeting
        .advisors
        .iter()
        .map(|a| Stance {
            role: a.role.as_str(),
            stance: a.verdict.as_str(),
        })
        .collect();
    let board_state = serde_json::to_string(&stances)
        .map_err(|e| OrchestratorError::Serialization(e.to_string()))?;

    let request = StructuredRequest::new(
        prompts::board_question_prompt(&board_state, question),
        schemas::board_reply_schema(),
    );
    let response = gateway.generate_structured(request).await?;
    let raw: RawReplies = decode(response.value, "board reply")?;

    let replies: Vec<BoardMessage> = raw
        .messages
        .unwrap_or_default()
        .into_iter()
        .filter_map(|reply| {
            let Some(role) = reply.role.as_deref().and_then(AdvisorRole::parse) else {
                debug!(role = ?reply.role, "Dropping reply from a non-advisor role");
                return None;
            };
            let text = non_blank(reply.text)?;
            let name = non_blank(reply.name)
                .or_else(|| meeting.advisor(role).map(|a| a.name.clone()))
                .unwrap_or_else(|| role.persona().name.to_string());
            Some(BoardMessage::advisor(role, name, text))
        })
        .take(MAX_REPLIES)
        .collect();

    info!(meeting_id = %meeting.id, replies = replies.len(), "Board answered");
    Ok(replies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(role: &str, name: &str, color: &str) -> RawAdvisor {
        RawAdvisor {
            role: Some(role.into()),
            name: Some(name.into()),
            avatar_color: Some(color.into()),
            advice: Some("advice".into()),
            concern: Some("concern".into()),
            verdict: Some("Approve".into()),
        }
    }

    #[test]
    fn test_seating_fills_missing_and_drops_duplicates() {
        let advisors = seat_advisors(vec![
            raw("CTO", "Alex", "#123456"),
            raw("CFO", "Marcus", "green"),
            raw("CTO", "Second Alex", "#654321"),
        ]);

        let roles: Vec<AdvisorRole> = advisors.iter().map(|a| a.role).collect();
        assert_eq!(roles, AdvisorRole::ALL.to_vec());

        // Invalid hex falls back to the persona color
        assert_eq!(advisors[0].avatar_color, "#10b981");
        // Missing CMO is seated from the persona table
        assert_eq!(advisors[1].name, "Sarah");
        assert_eq!(advisors[1].verdict, Verdict::Pivot);
        // First CTO entry wins
        assert_eq!(advisors[2].name, "Alex");
        assert_eq!(advisors[2].avatar_color, "#123456");
    }

    #[test]
    fn test_hex_color_pattern() {
        assert!(hex_color().is_match("#fff"));
        assert!(hex_color().is_match("#10B981"));
        assert!(!hex_color().is_match("10b981"));
        assert!(!hex_color().is_match("#10b98"));
    }
}

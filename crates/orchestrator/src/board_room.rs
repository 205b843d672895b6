//! Live board meeting and its transcript.
//!
//! Asking a question is a two-phase transition: the founder's message is
//! appended right away and announced as tentative, then the advisors'
//! replies are appended once the backend answers.

use std::sync::Arc;

use events::{BoardMessageData, Event, EventBus};
use gemini::ModelGateway;
use lens_core::{BoardMeeting, BoardMessage};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dispatch::Dispatch;
use crate::error::{OrchestratorError, Result};
use crate::resources::FeatureGuard;
use crate::services;

pub struct BoardRoom {
    meeting: RwLock<Option<BoardMeeting>>,
    chat_guard: Arc<FeatureGuard>,
    event_bus: Option<EventBus>,
}

impl BoardRoom {
    pub fn new(chat_guard: Arc<FeatureGuard>, event_bus: Option<EventBus>) -> Self {
        Self {
            meeting: RwLock::new(None),
            chat_guard,
            event_bus,
        }
    }

    pub async fn meeting(&self) -> Option<BoardMeeting> {
        self.meeting.read().await.clone()
    }

    pub async fn history(&self) -> Vec<BoardMessage> {
        self.meeting
            .read()
            .await
            .as_ref()
            .map(|m| m.chat_history.as_slice().to_vec())
            .unwrap_or_default()
    }

    /// Replaces the current meeting; any reply still in flight for the old
    /// one will be discarded.
    pub async fn install(&self, meeting: BoardMeeting) {
        debug!(meeting_id = %meeting.id, "Board meeting installed");
        *self.meeting.write().await = Some(meeting);
    }

    pub async fn clear(&self) {
        *self.meeting.write().await = None;
    }

    /// Asks the seated board a question.
    ///
    /// Returns `InFlight` without touching the transcript when a question is
    /// already pending, and `Superseded` when the meeting was replaced
    /// before the answer arrived. On failure the founder's message stays in
    /// the transcript.
    pub async fn ask<G>(
        &self,
        gateway: &G,
        question: &str,
        generation: u64,
    ) -> Result<Dispatch<Vec<BoardMessage>>>
    where
        G: ModelGateway + ?Sized,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(OrchestratorError::Validation(
                "Please enter a question for the board.".to_string(),
            ));
        }
        if self.meeting.read().await.is_none() {
            return Err(OrchestratorError::Validation(
                "Convene the board before asking a question.".to_string(),
            ));
        }

        let Some(mut permit) = self.chat_guard.try_acquire(generation, self.event_bus.clone())
        else {
            return Ok(Dispatch::InFlight);
        };

        // Phase one: optimistic append
        let snapshot = {
            let mut guard = self.meeting.write().await;
            let Some(meeting) = guard.as_mut() else {
                permit.mark_superseded();
                return Ok(Dispatch::Superseded(Vec::new()));
            };
            let message = BoardMessage::user(question);
            self.announce(meeting.id, &message, true);
            meeting.chat_history.push(message);
            meeting.clone()
        };

        let replies = match services::ask_board(gateway, &snapshot, question).await {
            Ok(replies) => replies,
            Err(e) => {
                permit.mark_failed(&e.to_string(), e.is_authorization());
                return Err(e);
            }
        };

        // Phase two: confirm against the meeting that is current now
        let mut guard = self.meeting.write().await;
        match guard.as_mut() {
            Some(meeting) if meeting.id == snapshot.id => {
                for reply in &replies {
                    self.announce(meeting.id, reply, false);
                }
                meeting.chat_history.extend(replies.iter().cloned());
                info!(
                    meeting_id = %meeting.id,
                    transcript = meeting.chat_history.len(),
                    "Board replies appended"
                );
                permit.mark_completed();
                Ok(Dispatch::Completed(replies))
            }
            _ => {
                debug!(meeting_id = %snapshot.id, "Meeting replaced, discarding replies");
                permit.mark_superseded();
                Ok(Dispatch::Superseded(replies))
            }
        }
    }

    fn announce(&self, meeting_id: Uuid, message: &BoardMessage, tentative: bool) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(Event::BoardMessageAppended {
                meeting_id,
                message: BoardMessageData {
                    role: message.role.as_str().to_string(),
                    name: message.name.clone(),
                    text: message.text.clone(),
                },
                tentative,
            });
        }
    }
}

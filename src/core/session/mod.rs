//! Design-iteration state machine.
//!
//! A [`Session`] owns the chat transcript, the version history and the
//! pointer to the design currently on display. Every backend call goes
//! through a single-slot [`RequestGuard`]: while one request is in flight,
//! further submissions are ignored rather than queued.
//!
//! Each request runs `Idle → Pending → Idle`. On success the new design is
//! prepended to the history and becomes current; on failure the history and
//! current pointer are left exactly as they were.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::core::design::{Design, DesignId, History};
use crate::core::guard::RequestGuard;
use crate::core::image::ImageRef;
use crate::core::message::{Message, MessageIds, Notification, Sender};
use crate::export::{export_image, ExportError, FileSaver};
use crate::gateway::{GenerationError, GenerationGateway};

pub const ACK_TEXT: &str = "Here's the design based on your description:";
pub const ERROR_TEXT: &str = "I'm sorry, I couldn't generate a design. Please try again.";
const REFINED_PREFIX: &str = "Refined: ";

/// Result of a submission that may or may not reach the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A precondition failed (empty input, request pending, nothing to
    /// refine). Nothing changed.
    Ignored,
    Generated(DesignId),
    Failed(GenerationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Ignored,
    Summarized(String),
    Failed(GenerationError),
}

#[derive(Default)]
struct SessionState {
    messages: Vec<Message>,
    history: History,
    current: Option<DesignId>,
    notifications: VecDeque<Notification>,
    ids: MessageIds,
}

impl SessionState {
    fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn current_design(&self) -> Option<&Design> {
        self.current.and_then(|id| self.history.get(id))
    }
}

pub struct Session {
    gateway: Box<dyn GenerationGateway>,
    guard: RequestGuard,
    // Never held across an await point.
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(gateway: impl GenerationGateway + 'static) -> Self {
        Self {
            gateway: Box::new(gateway),
            guard: RequestGuard::new(),
            state: Mutex::new(SessionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new design from a description and an optional room photo.
    pub async fn submit_prompt(&self, text: &str, image: Option<ImageRef>) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() && image.is_none() {
            return SubmitOutcome::Ignored;
        }
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("Prompt ignored while a request is pending");
            return SubmitOutcome::Ignored;
        };

        {
            let mut state = self.state();
            let id = state.ids.user();
            state.push_message(Message::new(id, Sender::User, text).with_image(image.clone()));
        }

        let result = self.gateway.create_design(text, image).await;

        let mut state = self.state();
        match result {
            Ok(image) => {
                let design_id = state.history.push(image, text);
                state.current = Some(design_id);
                let id = state.ids.ai();
                state.push_message(Message::new(id, Sender::Ai, ACK_TEXT));
                info!(
                    design = design_id.get(),
                    versions = state.history.len(),
                    "Design generated"
                );
                SubmitOutcome::Generated(design_id)
            }
            Err(err) => {
                warn!(error = %err, "Design generation failed");
                let id = state.ids.ai_error();
                state.push_message(Message::new(id, Sender::Ai, ERROR_TEXT));
                state.notifications.push_back(Notification::error(
                    "Error",
                    "Failed to generate design. Please try again.",
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Produces a new version of the current design from user feedback.
    pub async fn submit_feedback(&self, feedback: &str) -> SubmitOutcome {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Some(current) = self.state().current_design().map(|d| d.image().clone()) else {
            return SubmitOutcome::Ignored;
        };
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("Feedback ignored while a request is pending");
            return SubmitOutcome::Ignored;
        };

        let result = self.gateway.refine_design(feedback, current).await;

        let mut state = self.state();
        match result {
            Ok(image) => {
                let design_id = state
                    .history
                    .push(image, format!("{REFINED_PREFIX}{feedback}"));
                state.current = Some(design_id);
                state.notifications.push_back(Notification::info(
                    "Design Refined",
                    "The design has been updated based on your feedback.",
                ));
                info!(
                    design = design_id.get(),
                    versions = state.history.len(),
                    "Design refined"
                );
                SubmitOutcome::Generated(design_id)
            }
            Err(err) => {
                warn!(error = %err, "Design refinement failed");
                state.notifications.push_back(Notification::error(
                    "Error",
                    "Failed to refine design. Please try again.",
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Points the session at an earlier version. History is left untouched.
    pub fn select_version(&self, id: DesignId) -> bool {
        let mut state = self.state();
        if !state.history.contains(id) {
            return false;
        }
        state.current = Some(id);
        state.notifications.push_back(Notification::info(
            "History Loaded",
            "A previous version of the design has been loaded.",
        ));
        true
    }

    /// Writes the current design through `saver`. `Ok(None)` when there is
    /// nothing to export.
    pub fn export_current(&self, saver: &dyn FileSaver) -> Result<Option<PathBuf>, ExportError> {
        let Some(image) = self.state().current_design().map(|d| d.image().clone()) else {
            return Ok(None);
        };
        export_image(&image, saver).map(Some)
    }

    /// Asks the backend for a prose summary of how the design evolved and
    /// posts it to the transcript.
    pub async fn summarize_history(&self) -> SummaryOutcome {
        let prompts = self.state().history.prompts();
        if prompts.is_empty() {
            return SummaryOutcome::Ignored;
        }
        let Some(_permit) = self.guard.try_acquire() else {
            return SummaryOutcome::Ignored;
        };

        let result = self.gateway.summarize(prompts).await;

        let mut state = self.state();
        match result {
            Ok(summary) => {
                let id = state.ids.ai();
                state.push_message(Message::new(id, Sender::Ai, summary.clone()));
                SummaryOutcome::Summarized(summary)
            }
            Err(err) => {
                warn!(error = %err, "History summary failed");
                state.notifications.push_back(Notification::error(
                    "Error",
                    "Failed to summarize the design history. Please try again.",
                ));
                SummaryOutcome::Failed(err)
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.state().messages.len()
    }

    /// Messages appended after the first `from` entries.
    pub fn messages_since(&self, from: usize) -> Vec<Message> {
        self.state()
            .messages
            .get(from..)
            .map(<[Message]>::to_vec)
            .unwrap_or_default()
    }

    /// History snapshot, newest first.
    pub fn history(&self) -> Vec<Design> {
        self.state().history.to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.state().history.len()
    }

    pub fn current(&self) -> Option<Design> {
        self.state().current_design().cloned()
    }

    pub fn current_id(&self) -> Option<DesignId> {
        self.state().current
    }

    pub fn version_of(&self, id: DesignId) -> Option<usize> {
        self.state().history.version_of(id)
    }

    pub fn design_by_version(&self, version: usize) -> Option<DesignId> {
        self.state().history.by_version(version).map(Design::id)
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.state().notifications.drain(..).collect()
    }
}

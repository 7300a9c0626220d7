//! Interactive session state that sits between the command layer and the
//! design [`Session`].
//!
//! The session itself knows nothing about terminals. `App` adds what the
//! line interface needs on top of it: a pending attachment, the sentiment
//! chosen for the next refinement, the transcript log and a queue of status
//! lines waiting to be printed.

use std::path::{Path, PathBuf};

use crate::core::feedback::{compose_feedback, Sentiment};
use crate::core::image::{ImageRef, ImageRefError};
use crate::core::message::Message;
use crate::core::session::Session;
use crate::utils::logging::LoggingState;

#[derive(Debug, Clone)]
pub struct Attachment {
    pub path: PathBuf,
    pub image: ImageRef,
}

pub struct App {
    pub session: Session,
    pub logging: LoggingState,
    pub export_dir: PathBuf,
    attachment: Option<Attachment>,
    sentiment: Option<Sentiment>,
    output: Vec<String>,
    // Transcript entries already shown and logged.
    seen_messages: usize,
}

impl App {
    pub fn new(session: Session, logging: LoggingState, export_dir: PathBuf) -> Self {
        Self {
            session,
            logging,
            export_dir,
            attachment: None,
            sentiment: None,
            output: Vec::new(),
            seen_messages: 0,
        }
    }

    pub fn set_status(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn attach(&mut self, path: &Path) -> Result<&Attachment, ImageRefError> {
        let image = ImageRef::from_file(path)?;
        Ok(self.attachment.insert(Attachment {
            path: path.to_path_buf(),
            image,
        }))
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        self.attachment.take()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Selecting the active sentiment again clears it.
    pub fn toggle_sentiment(&mut self, sentiment: Sentiment) -> Option<Sentiment> {
        self.sentiment = if self.sentiment == Some(sentiment) {
            None
        } else {
            Some(sentiment)
        };
        self.sentiment
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    /// Combines `text` with the pending sentiment, which is consumed.
    pub fn compose_feedback(&mut self, text: &str) -> String {
        compose_feedback(text, self.sentiment.take())
    }

    /// Transcript entries appended since the last call. Each one is also
    /// written to the transcript log when logging is active.
    pub fn take_new_messages(&mut self) -> Vec<Message> {
        let fresh = self.session.messages_since(self.seen_messages);
        self.seen_messages += fresh.len();
        for message in &fresh {
            if let Err(e) = self.logging.log_message(message) {
                self.output.push(format!("Log error: {e}"));
            }
        }
        fresh
    }
}

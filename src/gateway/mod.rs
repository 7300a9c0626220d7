//! Boundary with the external image-generation backend.
//!
//! The session only talks to [`GenerationGateway`]. Creating a new design and
//! refining an existing one are the same capability with a different
//! [`GenerationRequest`] variant, so failure handling lives in one place.

pub mod api;
pub mod gemini;
pub mod prompts;

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::core::image::ImageRef;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    /// A fresh design from a text prompt, optionally guided by a room photo.
    Create {
        prompt: String,
        reference: Option<ImageRef>,
    },
    /// A new version of an existing design driven by user feedback.
    Refine { feedback: String, current: ImageRef },
}

impl GenerationRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationRequest::Create { .. } => "create",
            GenerationRequest::Refine { .. } => "refine",
        }
    }

    /// The image sent along with the request, if any.
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            GenerationRequest::Create { reference, .. } => reference.as_ref(),
            GenerationRequest::Refine { current, .. } => Some(current),
        }
    }
}

/// The backend declined or failed to produce output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The backend answered but returned no usable image or text, typically
    /// because a safety filter fired.
    NoOutput {
        finish_reason: Option<String>,
        block_reason: Option<String>,
        safety_ratings: Vec<String>,
    },
    /// Non-success HTTP status from the backend.
    Api { status: u16, message: String },
    /// The request never produced a response.
    Transport(String),
    /// An input image could not be prepared for upload.
    InvalidInput(String),
}

impl GenerationError {
    pub fn no_output() -> Self {
        GenerationError::NoOutput {
            finish_reason: None,
            block_reason: None,
            safety_ratings: Vec::new(),
        }
    }

    /// Whether the failure came from the backend's content filtering.
    pub fn is_safety_block(&self) -> bool {
        match self {
            GenerationError::NoOutput {
                finish_reason,
                block_reason,
                ..
            } => {
                block_reason.is_some()
                    || matches!(
                        finish_reason.as_deref(),
                        Some("SAFETY" | "IMAGE_SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST")
                    )
            }
            _ => false,
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NoOutput {
                finish_reason,
                block_reason,
                safety_ratings,
            } => {
                write!(f, "No image was generated")?;
                if let Some(reason) = block_reason {
                    write!(f, ". Blocked: {reason}")?;
                }
                if let Some(reason) = finish_reason {
                    write!(f, ". Finish reason: {reason}")?;
                }
                if !safety_ratings.is_empty() {
                    write!(f, ". Safety ratings: {}", safety_ratings.join(", "))?;
                }
                Ok(())
            }
            GenerationError::Api { status, message } => {
                write!(f, "API request failed with status {status}: {message}")
            }
            GenerationError::Transport(message) => write!(f, "Request failed: {message}"),
            GenerationError::InvalidInput(message) => write!(f, "Invalid input image: {message}"),
        }
    }
}

impl StdError for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

/// Opaque capability offered by the generative backend.
///
/// Calls are not deterministic: the same request may yield a different image
/// every time.
#[async_trait::async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageRef, GenerationError>;

    /// Summarizes how a design evolved, given the prompts of each version
    /// from oldest to newest.
    async fn summarize(&self, descriptions: Vec<String>) -> Result<String, GenerationError>;

    async fn create_design(
        &self,
        prompt: &str,
        reference: Option<ImageRef>,
    ) -> Result<ImageRef, GenerationError> {
        self.generate(GenerationRequest::Create {
            prompt: prompt.to_string(),
            reference,
        })
        .await
    }

    async fn refine_design(
        &self,
        feedback: &str,
        current: ImageRef,
    ) -> Result<ImageRef, GenerationError> {
        self.generate(GenerationRequest::Refine {
            feedback: feedback.to_string(),
            current,
        })
        .await
    }
}

#[async_trait::async_trait]
impl<T: GenerationGateway + ?Sized> GenerationGateway for Arc<T> {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageRef, GenerationError> {
        (**self).generate(request).await
    }

    async fn summarize(&self, descriptions: Vec<String>) -> Result<String, GenerationError> {
        (**self).summarize(descriptions).await
    }
}

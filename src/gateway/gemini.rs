use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

use super::api::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use super::prompts::{refine_prompt, summary_prompt};
use super::{GenerationError, GenerationGateway, GenerationRequest};
use crate::core::image::{mime_for_path, DataUri, ImageRef};
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Only this model family can return images from `generateContent`.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone, Debug)]
pub struct GeminiSettings {
    pub base_url: String,
    pub api_key: String,
    pub image_model: String,
    pub summary_model: String,
    pub request_timeout: Duration,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// [`GenerationGateway`] backed by the Gemini REST API.
pub struct GeminiGateway {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiGateway {
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    async fn resolve_image(&self, image: &ImageRef) -> Result<DataUri, GenerationError> {
        match image {
            ImageRef::Data(data) => Ok(data.clone()),
            ImageRef::Remote(url) => self.fetch_remote(url).await,
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<DataUri, GenerationError> {
        debug!(url = %url, "Downloading remote image for upload");
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|err| GenerationError::InvalidInput(err.to_string()))?;

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| value.starts_with("image/"))
            .or_else(|| mime_for_path(Path::new(response.url().path())).map(str::to_string))
            .unwrap_or_else(|| "image/png".to_string());
        let bytes = response.bytes().await?;
        Ok(DataUri::from_bytes(mime, &bytes))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = construct_api_url(
            &self.settings.base_url,
            &format!("models/{model}:generateContent"),
        );
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), model = %model, "Generation request rejected");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

#[async_trait::async_trait]
impl GenerationGateway for GeminiGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageRef, GenerationError> {
        let kind = request.kind();
        let image = match request.image() {
            Some(image) => Some(self.resolve_image(image).await?),
            None => None,
        };
        let parts = request_parts(&request, image.as_ref());

        debug!(
            kind,
            model = %self.settings.image_model,
            parts = parts.len(),
            "Sending generation request"
        );
        let response = self
            .generate_content(&self.settings.image_model, &image_request(parts))
            .await?;
        let image = extract_image(&response);
        if let Err(err) = &image {
            warn!(kind, error = %err, "Backend returned no image");
        }
        image
    }

    async fn summarize(&self, descriptions: Vec<String>) -> Result<String, GenerationError> {
        debug!(
            model = %self.settings.summary_model,
            versions = descriptions.len(),
            "Requesting design history summary"
        );
        let request = text_request(vec![Part::text(summary_prompt(&descriptions))]);
        let response = self
            .generate_content(&self.settings.summary_model, &request)
            .await?;
        extract_text(&response)
    }
}

/// Parts of an image request, with the request's photo or current design
/// already inlined as `image`.
pub(crate) fn request_parts(request: &GenerationRequest, image: Option<&DataUri>) -> Vec<Part> {
    let inline = image.map(|data| Part::inline(data.mime(), data.payload()));
    match request {
        GenerationRequest::Create { prompt, .. } => {
            let prompt = prompt.trim();
            // Gemini rejects empty text parts with INVALID_ARGUMENT.
            let text = (!prompt.is_empty()).then(|| Part::text(prompt));
            text.into_iter().chain(inline).collect()
        }
        GenerationRequest::Refine { feedback, .. } => inline
            .into_iter()
            .chain(std::iter::once(Part::text(refine_prompt(feedback))))
            .collect(),
    }
}

pub(crate) fn image_request(parts: Vec<Part>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        // The image model rejects IMAGE-only modality lists.
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
        }),
    }
}

pub(crate) fn text_request(parts: Vec<Part>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: None,
    }
}

pub(crate) fn extract_image(response: &GenerateContentResponse) -> Result<ImageRef, GenerationError> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| {
            content
                .parts
                .iter()
                .find_map(|part| part.inline_data.as_ref())
        })
        .filter(|inline| !inline.data.is_empty())
        .map(|inline| ImageRef::Data(DataUri::from_base64(&inline.mime_type, &inline.data)))
        .ok_or_else(|| no_output_error(response))
}

pub(crate) fn extract_text(response: &GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(no_output_error(response))
    } else {
        Ok(trimmed.to_string())
    }
}

fn no_output_error(response: &GenerateContentResponse) -> GenerationError {
    let candidate = response.candidates.first();
    let feedback = response.prompt_feedback.as_ref();
    let safety_ratings = candidate
        .map(|c| c.safety_ratings.as_slice())
        .filter(|ratings| !ratings.is_empty())
        .or_else(|| feedback.map(|f| f.safety_ratings.as_slice()))
        .unwrap_or_default()
        .iter()
        .map(|rating| rating.summary())
        .collect();

    GenerationError::NoOutput {
        finish_reason: candidate.and_then(|c| c.finish_reason.clone()),
        block_reason: feedback.and_then(|f| f.block_reason.clone()),
        safety_ratings,
    }
}

/// Pulls a one-line message out of an error body, falling back to the raw
/// text when it is not the usual `{"error": {"message": ...}}` shape.
fn api_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
                .or_else(|| {
                    value
                        .get("message")
                        .and_then(|v| v.as_str().map(str::to_owned))
                })
        });

    match summary {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => trimmed.to_string(),
    }
}

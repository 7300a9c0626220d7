use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::image::{DataUri, ImageRef};
use crate::core::session::Session;
use crate::gateway::{GenerationError, GenerationGateway, GenerationRequest};

/// In-memory gateway that replays queued results and records every call.
///
/// Each call yields to the scheduler once before answering, so concurrent
/// submissions against the same session genuinely overlap.
#[derive(Default)]
pub struct ScriptedGateway {
    images: Mutex<VecDeque<Result<ImageRef, GenerationError>>>,
    summaries: Mutex<VecDeque<Result<String, GenerationError>>>,
    calls: Mutex<Vec<GenerationRequest>>,
    summary_calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_image(&self, image: ImageRef) {
        self.images.lock().unwrap().push_back(Ok(image));
    }

    pub fn push_failure(&self, err: GenerationError) {
        self.images.lock().unwrap().push_back(Err(err));
    }

    pub fn push_summary(&self, result: Result<String, GenerationError>) {
        self.summaries.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn summary_calls(&self) -> Vec<Vec<String>> {
        self.summary_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationGateway for ScriptedGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageRef, GenerationError> {
        self.calls.lock().unwrap().push(request);
        tokio::task::yield_now().await;
        self.images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::no_output()))
    }

    async fn summarize(&self, descriptions: Vec<String>) -> Result<String, GenerationError> {
        self.summary_calls.lock().unwrap().push(descriptions);
        tokio::task::yield_now().await;
        self.summaries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::no_output()))
    }
}

pub fn test_image(tag: &str) -> ImageRef {
    ImageRef::Data(DataUri::from_bytes("image/png", tag.as_bytes()))
}

pub fn create_test_session() -> (Session, Arc<ScriptedGateway>) {
    let gateway = ScriptedGateway::new();
    (Session::new(gateway.clone()), gateway)
}

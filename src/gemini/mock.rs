use async_trait::async_trait;
use base64::Engine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    ApiError, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    GenerativeBackend, InlineData, ModelInfo, Part,
};

/// Canned reply for one model.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Raw PCM; encoded to base64 on the way out.
    Audio(Vec<u8>),
    /// Inline data that is not valid base64.
    RawInlineData(String),
    /// Well-formed response with no candidates.
    Empty,
    Status { status: u16, message: Option<String> },
    Transport(String),
}

impl MockReply {
    pub fn status(status: u16, message: &str) -> Self {
        Self::Status {
            status,
            message: Some(message.to_string()),
        }
    }

    fn respond(&self) -> Result<GenerateContentResponse, ApiError> {
        let part = match self {
            MockReply::Text(text) => Part {
                text: Some(text.clone()),
                inline_data: None,
            },
            MockReply::Audio(pcm) => Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: Some("audio/L16;codec=pcm;rate=24000".to_string()),
                    data: base64::engine::general_purpose::STANDARD.encode(pcm),
                }),
            },
            MockReply::RawInlineData(data) => Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: None,
                    data: data.clone(),
                }),
            },
            MockReply::Empty => return Ok(GenerateContentResponse::default()),
            MockReply::Status { status, message } => {
                return Err(ApiError::Status {
                    status: *status,
                    message: message.clone(),
                })
            }
            MockReply::Transport(message) => return Err(ApiError::Transport(message.clone())),
        };

        Ok(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content { parts: vec![part] }),
            }],
        })
    }
}

/// In-memory backend that records every call. Models without a reply answer
/// with a 404, like an unknown model id would.
#[derive(Clone, Default)]
pub struct MockBackend {
    models: Option<Vec<ModelInfo>>,
    replies: HashMap<String, MockReply>,
    list_calls: Arc<Mutex<usize>>,
    calls: Arc<Mutex<Vec<(String, GenerateContentRequest)>>>,
}

impl MockBackend {
    /// Backend whose registry is unreachable.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_reply(mut self, model: &str, reply: MockReply) -> Self {
        self.replies.insert(model.to_string(), reply);
        self
    }

    /// Models passed to `generate_content`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(model, _)| model.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        *self.list_calls.lock().unwrap() += 1;
        self.models
            .clone()
            .ok_or_else(|| ApiError::Transport("registry unavailable".to_string()))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        match self.replies.get(model) {
            Some(reply) => reply.respond(),
            None => Err(ApiError::Status {
                status: 404,
                message: Some(format!("models/{model} is not found")),
            }),
        }
    }
}

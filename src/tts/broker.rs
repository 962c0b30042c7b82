//! Ordered walk over the speech candidates.
//!
//! `Trying(i)` issues one request to `candidates[i]`. Success stops the walk;
//! every failure moves on to `i + 1` until the list runs out.

use base64::Engine;
use std::fmt;

use crate::gemini::{ApiError, GenerateContentRequest, GenerativeBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateFailure {
    /// 404 or 400: the model is gone or cannot emit audio.
    Unsupported { status: u16, message: Option<String> },
    Rejected { status: u16, message: Option<String> },
    Transport(String),
    /// Response body was not the expected JSON.
    MalformedResponse(String),
    MissingAudio,
    Decode(String),
}

impl CandidateFailure {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CandidateFailure::Unsupported { .. })
    }
}

impl From<ApiError> for CandidateFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } if status == 404 || status == 400 => {
                CandidateFailure::Unsupported { status, message }
            }
            ApiError::Status { status, message } => CandidateFailure::Rejected { status, message },
            ApiError::Transport(message) => CandidateFailure::Transport(message),
            ApiError::Decode(message) => CandidateFailure::MalformedResponse(message),
        }
    }
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateFailure::Unsupported { status, message } => write!(
                f,
                "not available or no audio support (HTTP {status}){}",
                suffix(message.as_deref())
            ),
            CandidateFailure::Rejected { status, message } => {
                write!(f, "rejected (HTTP {status}){}", suffix(message.as_deref()))
            }
            CandidateFailure::Transport(message) => write!(f, "request failed: {message}"),
            CandidateFailure::MalformedResponse(message) => {
                write!(f, "malformed response body: {message}")
            }
            CandidateFailure::MissingAudio => f.write_str("no audio data in response"),
            CandidateFailure::Decode(message) => write!(f, "undecodable audio payload: {message}"),
        }
    }
}

fn suffix(message: Option<&str>) -> String {
    message
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Trying(usize),
    Success { model: String, pcm: Vec<u8> },
    Exhausted,
}

impl State {
    pub fn start(total: usize) -> Self {
        Self::next_from(0, total)
    }

    /// State after `candidates[index]` failed.
    pub fn after_failure(index: usize, total: usize) -> Self {
        Self::next_from(index + 1, total)
    }

    fn next_from(index: usize, total: usize) -> Self {
        if index < total {
            State::Trying(index)
        } else {
            State::Exhausted
        }
    }
}

#[derive(Debug)]
pub struct Resolution {
    /// `Success` or `Exhausted`.
    pub state: State,
    pub failures: Vec<(String, CandidateFailure)>,
}

/// One audio request; returns raw PCM on success.
pub async fn attempt(
    backend: &dyn GenerativeBackend,
    model: &str,
    text: &str,
    voice: &str,
) -> Result<Vec<u8>, CandidateFailure> {
    let request = GenerateContentRequest::speech(text, voice);
    let response = backend.generate_content(model, &request).await?;
    let data = response
        .first_inline_data()
        .ok_or(CandidateFailure::MissingAudio)?;
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| CandidateFailure::Decode(e.to_string()))
}

pub async fn run(
    backend: &dyn GenerativeBackend,
    candidates: &[String],
    text: &str,
    voice: &str,
) -> Resolution {
    let total = candidates.len();
    let mut failures = Vec::new();
    let mut state = State::start(total);

    while let State::Trying(index) = state {
        let model = &candidates[index];
        tracing::info!(candidate = %model, attempt = index + 1, total, voice, "attempting audio generation");

        state = match attempt(backend, model, text, voice).await {
            Ok(pcm) => State::Success {
                model: model.clone(),
                pcm,
            },
            Err(failure) => {
                if failure.is_unsupported() {
                    tracing::warn!(candidate = %model, reason = %failure, "model unsupported; trying next");
                } else {
                    tracing::warn!(candidate = %model, reason = %failure, "audio generation failed; trying next");
                }
                failures.push((model.clone(), failure));
                State::after_failure(index, total)
            }
        };
    }

    Resolution { state, failures }
}

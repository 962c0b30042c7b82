//! Script stage: pick a text model, then ask it for a short spoken pitch.

use thiserror::Error;

use crate::config::TextConfig;
use crate::gemini::{ApiError, GenerateContentRequest, GenerativeBackend, ModelInfo, GENERATE_CONTENT};
use crate::style::Style;

/// Returned when the model answers without any text.
// TODO: surface this as an error once callers can tell "no text" apart from a real script.
pub const EMPTY_SCRIPT_PLACEHOLDER: &str = "Failed to generate script.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Backend(String),

    #[error("Script generation failed ({0}). Check API Key.")]
    Status(u16),

    #[error("script request failed: {0}")]
    Transport(String),
}

impl From<ApiError> for GenerationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => GenerationError::Backend(message),
            ApiError::Status { status, .. } => GenerationError::Status(status),
            ApiError::Transport(message) | ApiError::Decode(message) => {
                GenerationError::Transport(message)
            }
        }
    }
}

/// Picks a text model from the registry listing.
///
/// Vision-only models and models that cannot `generateContent` are skipped.
/// The first entry of `preferred` that is present wins; otherwise the first
/// usable model; otherwise `fallback`.
pub fn select_model(models: &[ModelInfo], preferred: &[String], fallback: &str) -> String {
    let usable: Vec<&str> = models
        .iter()
        .filter(|m| m.supports(GENERATE_CONTENT) && !m.name.contains("vision"))
        .map(ModelInfo::id)
        .collect();

    preferred
        .iter()
        .find(|pref| usable.contains(&pref.as_str()))
        .map(|pref| pref.to_string())
        .or_else(|| usable.first().map(|id| id.to_string()))
        .unwrap_or_else(|| fallback.to_string())
}

pub fn build_prompt(idea: &str, style: Style, intensity: Option<u8>) -> String {
    let mut prompt = format!(
        "Turn this idea into a 30-40 second natural spoken script (approx 60-80 words): \"{idea}\".\n\
         Style: {}.\n\
         Instruction: {}\n",
        style.label(),
        style.instruction(),
    );

    if let Some(intensity) = intensity {
        prompt.push_str(&format!(
            "Intensity: {intensity}% (0% is calm and understated, 100% is maximum energy).\n"
        ));
    }

    prompt.push_str(
        "Rules: No bullet points. Use only natural spoken language. \
         Do not include stage directions like [Music Fades In]. Just the text to be spoken.",
    );
    prompt
}

pub struct ScriptGenerator<'a> {
    backend: &'a dyn GenerativeBackend,
    config: &'a TextConfig,
}

impl<'a> ScriptGenerator<'a> {
    pub fn new(backend: &'a dyn GenerativeBackend, config: &'a TextConfig) -> Self {
        Self { backend, config }
    }

    /// Never fails. A registry error resolves to `default_model`; a listing
    /// with nothing usable resolves to `empty_listing_model`.
    pub async fn resolve_model(&self) -> String {
        match self.backend.list_models().await {
            Ok(models) => select_model(
                &models,
                &self.config.preferred_models,
                &self.config.empty_listing_model,
            ),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    fallback = %self.config.default_model,
                    "model list failed; using default text model"
                );
                self.config.default_model.clone()
            }
        }
    }

    /// `idea` is expected to be trimmed and non-empty.
    pub async fn generate(
        &self,
        idea: &str,
        style: Style,
        intensity: Option<u8>,
    ) -> Result<String, GenerationError> {
        let prompt = build_prompt(idea, style, intensity);
        let model = self.resolve_model().await;
        tracing::info!(model = %model, style = %style, "generating script");

        let request =
            GenerateContentRequest::text_prompt(prompt, self.config.temperature, self.config.top_p);
        let response = self
            .backend
            .generate_content(&model, &request)
            .await
            .map_err(|err| {
                tracing::error!(model = %model, error = %err, "script generation failed");
                GenerationError::from(err)
            })?;

        match response.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                tracing::warn!(model = %model, "response had no text; returning placeholder");
                Ok(EMPTY_SCRIPT_PLACEHOLDER.to_string())
            }
        }
    }
}

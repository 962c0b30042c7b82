//! Idea in, script and audio out.

use chrono::{DateTime, TimeZone};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Config;
use crate::gemini::GenerativeBackend;
use crate::script::{GenerationError, ScriptGenerator};
use crate::style::Style;
use crate::tts::provider::LocalSpeaker;
use crate::tts::{AudioResult, SpeechSynthesizer};

pub const MAX_INTENSITY: u8 = 100;

#[derive(Debug, Error)]
pub enum PitchError {
    #[error("idea must not be empty")]
    EmptyIdea,

    #[error("intensity must be between 0 and {MAX_INTENSITY}, got {0}")]
    InvalidIntensity(u8),

    #[error(transparent)]
    Script(#[from] GenerationError),
}

#[derive(Debug, Clone)]
pub struct Pitch {
    pub script: String,
    pub audio: AudioResult,
}

pub fn validate_idea(idea: &str) -> Result<&str, PitchError> {
    let idea = idea.trim();
    if idea.is_empty() {
        return Err(PitchError::EmptyIdea);
    }
    Ok(idea)
}

pub fn validate_intensity(intensity: Option<u8>) -> Result<Option<u8>, PitchError> {
    match intensity {
        Some(value) if value > MAX_INTENSITY => Err(PitchError::InvalidIntensity(value)),
        other => Ok(other),
    }
}

/// Script first, then speech. A script failure stops the run before any
/// audio request is made; speech never fails.
pub async fn generate_pitch(
    backend: &dyn GenerativeBackend,
    speaker: &dyn LocalSpeaker,
    config: &Config,
    idea: &str,
    style: Style,
    intensity: Option<u8>,
) -> Result<Pitch, PitchError> {
    let idea = validate_idea(idea)?;
    let intensity = validate_intensity(intensity)?;

    let script = ScriptGenerator::new(backend, &config.text)
        .generate(idea, style, intensity)
        .await?;

    let audio = SpeechSynthesizer::new(backend, &config.speech, speaker)
        .synthesize(&script, style)
        .await;

    Ok(Pitch { script, audio })
}

pub fn default_output_name<Tz: TimeZone>(now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!("pitch-{}.wav", now.format("%Y%m%d-%H%M%S")))
}

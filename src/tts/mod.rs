pub mod broker;
pub mod local;
pub mod provider;

use crate::audio::wav;
use crate::config::SpeechConfig;
use crate::gemini::GenerativeBackend;
use crate::style::Style;
use broker::State;
use provider::LocalSpeaker;

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub model: String,
    pub voice: String,
    /// Complete WAV container.
    pub wav: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioResult {
    Synthesized(SynthesizedAudio),
    /// Every candidate failed; the text went to on-device speech instead and
    /// there are no bytes to keep.
    FellBackToLocal,
}

impl AudioResult {
    /// Playable bytes, or an empty slice after a local fallback.
    pub fn bytes(&self) -> &[u8] {
        match self {
            AudioResult::Synthesized(audio) => &audio.wav,
            AudioResult::FellBackToLocal => &[],
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AudioResult::FellBackToLocal)
    }
}

pub struct SpeechSynthesizer<'a> {
    backend: &'a dyn GenerativeBackend,
    candidates: &'a [String],
    speaker: &'a dyn LocalSpeaker,
}

impl<'a> SpeechSynthesizer<'a> {
    pub fn new(
        backend: &'a dyn GenerativeBackend,
        config: &'a SpeechConfig,
        speaker: &'a dyn LocalSpeaker,
    ) -> Self {
        Self {
            backend,
            candidates: &config.candidates,
            speaker,
        }
    }

    /// Never fails. Falls back to local speech when no candidate returns audio.
    pub async fn synthesize(&self, text: &str, style: Style) -> AudioResult {
        let voice = style.voice();
        let resolution = broker::run(self.backend, self.candidates, text, voice).await;

        match resolution.state {
            State::Success { model, pcm } => {
                tracing::info!(model = %model, voice, pcm_bytes = pcm.len(), "audio generated");
                AudioResult::Synthesized(SynthesizedAudio {
                    model,
                    voice: voice.to_string(),
                    wav: wav::wrap_pcm(&pcm),
                })
            }
            State::Exhausted | State::Trying(_) => {
                tracing::error!(
                    attempts = resolution.failures.len(),
                    "all audio models failed; falling back to local speech"
                );
                fallback_speech(self.speaker, text).await
            }
        }
    }
}

/// Speaks `text` on the device and returns the fallback marker. Playback
/// errors are logged only.
pub async fn fallback_speech(speaker: &dyn LocalSpeaker, text: &str) -> AudioResult {
    if let Err(err) = speaker.speak(text).await {
        tracing::warn!(speaker = speaker.name(), error = ?err, "local speech failed");
    }
    AudioResult::FellBackToLocal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::mock::{MockBackend, MockReply};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl LocalSpeaker for RecordingSpeaker {
        fn name(&self) -> &str {
            "recording"
        }

        async fn speak(&self, text: &str) -> anyhow::Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            if self.fail {
                anyhow::bail!("no audio device");
            }
            Ok(())
        }
    }

    fn config() -> SpeechConfig {
        SpeechConfig::default()
    }

    #[tokio::test]
    async fn first_candidate_success_wraps_wav() {
        let config = config();
        let first = config.candidates[0].clone();
        let backend = MockBackend::new()
            .with_reply(&first, MockReply::Audio(vec![1, 0, 2, 0]))
            .with_reply(&config.candidates[1], MockReply::Audio(vec![3, 0]));
        let speaker = RecordingSpeaker::default();

        let result = SpeechSynthesizer::new(&backend, &config, &speaker)
            .synthesize("Hello there", Style::Startup)
            .await;

        assert!(!result.is_fallback());
        assert_eq!(result.bytes().len(), wav::HEADER_LEN + 4);
        assert_eq!(&result.bytes()[..4], b"RIFF");
        assert_eq!(&result.bytes()[wav::HEADER_LEN..], &[1, 0, 2, 0]);
        match &result {
            AudioResult::Synthesized(audio) => {
                assert_eq!(audio.model, first);
                assert_eq!(audio.voice, "Kore");
            }
            AudioResult::FellBackToLocal => unreachable!(),
        }
        assert_eq!(backend.calls(), vec![first]);
        assert!(speaker.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn skips_unsupported_models_in_order() {
        let config = config();
        let backend = MockBackend::new()
            .with_reply(&config.candidates[0], MockReply::status(400, "audio not supported"))
            .with_reply(&config.candidates[2], MockReply::Audio(vec![5; 6]));
        let speaker = RecordingSpeaker::default();

        let result = SpeechSynthesizer::new(&backend, &config, &speaker)
            .synthesize("Hi", Style::GameTrailer)
            .await;

        assert_eq!(result.bytes().len(), wav::HEADER_LEN + 6);
        assert_eq!(backend.calls(), config.candidates[..3].to_vec());
    }

    #[tokio::test]
    async fn all_failures_fall_back_with_empty_payload() {
        let config = config();
        let backend = MockBackend::new()
            .with_reply(&config.candidates[0], MockReply::status(403, "quota"))
            .with_reply(&config.candidates[1], MockReply::status(500, "boom"))
            .with_reply(&config.candidates[2], MockReply::Empty)
            .with_reply(&config.candidates[3], MockReply::Transport("reset".into()));
        let speaker = RecordingSpeaker::default();

        let result = SpeechSynthesizer::new(&backend, &config, &speaker)
            .synthesize("Fallback text", Style::CrazyHype)
            .await;

        assert!(result.is_fallback());
        assert!(result.bytes().is_empty());
        assert_eq!(backend.calls(), config.candidates);
        assert_eq!(*speaker.spoken.lock().unwrap(), vec!["Fallback text".to_string()]);
    }

    #[tokio::test]
    async fn candidate_order_is_stable_across_calls() {
        let config = config();
        let backend = MockBackend::new();
        let speaker = RecordingSpeaker::default();
        let synthesizer = SpeechSynthesizer::new(&backend, &config, &speaker);

        synthesizer.synthesize("one", Style::Startup).await;
        synthesizer.synthesize("two", Style::Startup).await;

        let calls = backend.calls();
        let n = config.candidates.len();
        assert_eq!(calls[..n], calls[n..]);
        assert_eq!(calls[0], config.candidates[0]);
    }

    #[tokio::test]
    async fn fallback_ignores_speaker_errors() {
        let speaker = RecordingSpeaker {
            fail: true,
            ..Default::default()
        };
        let result = fallback_speech(&speaker, "words").await;
        assert_eq!(result, AudioResult::FellBackToLocal);
        assert_eq!(speaker.spoken.lock().unwrap().len(), 1);
    }
}

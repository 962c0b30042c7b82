use async_trait::async_trait;

use super::local::SystemSpeaker;
use crate::config::SpeechConfig;

/// On-device speech used when no remote model produced audio.
#[async_trait]
pub trait LocalSpeaker: Send + Sync {
    fn name(&self) -> &str;
    async fn speak(&self, text: &str) -> anyhow::Result<()>;
}

/// Speaks nothing. Used when local fallback is disabled or unavailable.
pub struct SilentSpeaker;

#[async_trait]
impl LocalSpeaker for SilentSpeaker {
    fn name(&self) -> &str {
        "silent"
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        tracing::info!(chars = text.len(), "local speech disabled; nothing played");
        Ok(())
    }
}

pub fn select_speaker(config: &SpeechConfig) -> Box<dyn LocalSpeaker> {
    if !config.local_fallback {
        return Box::new(SilentSpeaker);
    }

    match SystemSpeaker::detect() {
        Some(speaker) => Box::new(speaker),
        None => {
            tracing::warn!("no on-device speech engine found; fallback will be silent");
            Box::new(SilentSpeaker)
        }
    }
}

//! System text-to-speech commands (`say`, `espeak-ng`, `espeak`, `spd-say`).

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;

use super::provider::LocalSpeaker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    Say,
    EspeakNg,
    Espeak,
    SpdSay,
}

impl Engine {
    pub fn program(self) -> &'static str {
        match self {
            Engine::Say => "say",
            Engine::EspeakNg => "espeak-ng",
            Engine::Espeak => "espeak",
            Engine::SpdSay => "spd-say",
        }
    }

    /// getopt engines need `--` so dash-led text is not read as options.
    fn ends_options(self) -> bool {
        !matches!(self, Engine::Say)
    }

    fn probe_order() -> &'static [Engine] {
        if cfg!(target_os = "macos") {
            &[Engine::Say]
        } else {
            &[Engine::EspeakNg, Engine::Espeak, Engine::SpdSay]
        }
    }
}

pub fn detect_engine() -> Option<Engine> {
    Engine::probe_order()
        .iter()
        .copied()
        .find(|engine| on_path(engine.program()))
}

pub(crate) fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

/// Picks a voice from `say -v ?` output. US English first, then any English.
pub fn pick_say_voice(listing: &str) -> Option<String> {
    let voices: Vec<(String, String)> = listing.lines().filter_map(parse_say_line).collect();

    voices
        .iter()
        .find(|(_, locale)| locale == "en_US")
        .or_else(|| voices.iter().find(|(_, locale)| locale.starts_with("en_")))
        .map(|(name, _)| name.clone())
}

// "Eddy (English (US))  en_US    # Hello! My name is Eddy."
fn parse_say_line(line: &str) -> Option<(String, String)> {
    let entry = line.split('#').next()?.trim();
    let (name, locale) = entry.rsplit_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() || locale.is_empty() {
        return None;
    }
    Some((name.to_string(), locale.to_string()))
}

pub struct SystemSpeaker {
    engine: Engine,
}

impl SystemSpeaker {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn detect() -> Option<Self> {
        detect_engine().map(Self::new)
    }

    /// Options plus the text to speak.
    async fn command_args(&self, text: &str) -> Vec<String> {
        let mut args = self.voice_args().await;
        if self.engine.ends_options() {
            args.push("--".to_string());
        }
        args.push(text.to_string());
        args
    }

    async fn voice_args(&self) -> Vec<String> {
        match self.engine {
            Engine::Say => match list_say_voices().await {
                Some(voice) => vec!["-v".to_string(), voice],
                None => Vec::new(),
            },
            Engine::EspeakNg | Engine::Espeak => vec!["-v".to_string(), "en-us".to_string()],
            Engine::SpdSay => vec!["-l".to_string(), "en".to_string(), "-w".to_string()],
        }
    }
}

async fn list_say_voices() -> Option<String> {
    let output = Command::new("say").args(["-v", "?"]).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    pick_say_voice(&String::from_utf8_lossy(&output.stdout))
}

#[async_trait]
impl LocalSpeaker for SystemSpeaker {
    fn name(&self) -> &str {
        self.engine.program()
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        let args = self.command_args(text).await;
        tracing::info!(engine = self.engine.program(), chars = text.len(), "speaking locally");

        let status = Command::new(self.engine.program())
            .args(&args)
            .status()
            .await
            .with_context(|| format!("run {}", self.engine.program()))?;

        if !status.success() {
            bail!("{} exited with status {status}", self.engine.program());
        }

        Ok(())
    }
}

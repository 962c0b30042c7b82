use serde::Serialize;

use crate::audio::renderer::{self, Player};
use crate::tts::local::{self, Engine};

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub speech_engine: Option<Engine>,
    pub audio_player: Option<Player>,
    pub api_key_set: bool,
}

pub fn detect(api_key_set: bool) -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        speech_engine: local::detect_engine(),
        audio_player: renderer::detect_player(),
        api_key_set,
    }
}

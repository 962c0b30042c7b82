use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use std::process::Command;

use crate::tts::local::on_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Afplay,
    Paplay,
    Aplay,
}

impl Player {
    pub fn program(self) -> &'static str {
        match self {
            Player::Afplay => "afplay",
            Player::Paplay => "paplay",
            Player::Aplay => "aplay",
        }
    }

    fn args(self, path: &Path, volume: f32) -> Vec<String> {
        let path = path.display().to_string();
        match self {
            Player::Afplay => vec!["-v".to_string(), volume.to_string(), path],
            // paplay volume is linear, 65536 = 100%
            Player::Paplay => vec![
                format!("--volume={}", (volume.clamp(0.0, 1.0) * 65536.0).round() as u32),
                path,
            ],
            Player::Aplay => vec!["-q".to_string(), path],
        }
    }
}

pub fn detect_player() -> Option<Player> {
    let order: &[Player] = if cfg!(target_os = "macos") {
        &[Player::Afplay]
    } else {
        &[Player::Paplay, Player::Aplay]
    };
    order.iter().copied().find(|player| on_path(player.program()))
}

pub fn play_file(path: &Path, volume: f32) -> anyhow::Result<()> {
    let player = detect_player().context("no audio player found (need afplay, paplay or aplay)")?;
    let status = Command::new(player.program())
        .args(player.args(path, volume))
        .status()
        .with_context(|| format!("play audio with {}: {}", player.program(), path.display()))?;

    if !status.success() {
        bail!("{} exited with status {status}", player.program());
    }

    Ok(())
}

pub fn play_bytes(bytes: &[u8], volume: f32) -> anyhow::Result<()> {
    let mut temp = tempfile::Builder::new()
        .suffix(".wav")
        .tempfile()
        .context("create temp file")?;
    std::io::Write::write_all(&mut temp, bytes).context("write audio bytes")?;
    play_file(temp.path(), volume)
}

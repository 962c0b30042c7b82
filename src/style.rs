use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tone of a generated pitch. Selects both the prompt instruction and the
/// synthesis voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    #[value(alias = "startup-pitch")]
    Startup,
    #[value(alias = "trailer")]
    GameTrailer,
    #[value(alias = "science", alias = "scientific-explainer")]
    Scientific,
    #[value(alias = "hype")]
    CrazyHype,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Startup,
        Style::GameTrailer,
        Style::Scientific,
        Style::CrazyHype,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Style::Startup => "Startup pitch",
            Style::GameTrailer => "Game trailer",
            Style::Scientific => "Scientific explainer",
            Style::CrazyHype => "Crazy hype",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Style::Startup => "Professional, visionary, and energetic. Focus on the 'problem/solution' narrative. Use terms like 'scalability', 'innovation', and 'future'.",
            Style::GameTrailer => "Epic, cinematic, and dramatic. Use intense pauses, heavy adjectives, and a 'coming soon' vibe. Imagine a movie trailer voice.",
            Style::Scientific => "Curious, clear, and educational. Explain the mechanism with wonder but precision. Use 'fascinating', 'discovery', and 'observe'.",
            Style::CrazyHype => "Maximum energy, fast-paced, urban slang, and high enthusiasm. Lots of exclamation marks in feeling. Use 'insane', 'next level', and 'absolute fire'.",
        }
    }

    /// Prebuilt voice name sent to the speech model.
    pub fn voice(self) -> &'static str {
        match self {
            Style::Startup => "Kore",
            Style::GameTrailer => "Fenrir",
            Style::Scientific => "Puck",
            Style::CrazyHype => "Charon",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_style_has_instruction_and_voice() {
        for style in Style::ALL {
            assert!(!style.instruction().is_empty(), "{style:?}");
            assert!(!style.voice().is_empty(), "{style:?}");
            assert!(!style.label().is_empty(), "{style:?}");
        }
    }

    #[test]
    fn all_lists_every_value_variant_once() {
        let from_clap: HashSet<Style> = Style::value_variants().iter().copied().collect();
        let from_all: HashSet<Style> = Style::ALL.iter().copied().collect();
        assert_eq!(from_clap, from_all);
        assert_eq!(from_all.len(), Style::ALL.len());
    }

    #[test]
    fn voices_match_known_mapping() {
        assert_eq!(Style::Startup.voice(), "Kore");
        assert_eq!(Style::GameTrailer.voice(), "Fenrir");
        assert_eq!(Style::Scientific.voice(), "Puck");
        assert_eq!(Style::CrazyHype.voice(), "Charon");
    }

    #[test]
    fn parses_aliases_from_cli() {
        assert_eq!(Style::from_str("hype", true).unwrap(), Style::CrazyHype);
        assert_eq!(Style::from_str("game-trailer", true).unwrap(), Style::GameTrailer);
        assert_eq!(Style::from_str("science", true).unwrap(), Style::Scientific);
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&Style::GameTrailer).unwrap();
        assert_eq!(json, "\"game-trailer\"");
    }
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::style::Style;

#[derive(Parser, Debug)]
#[command(name = "vibepitch", version, about = "Turn a one-line idea into a spoken pitch")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Pitch(PitchArgs),
    Script(ScriptArgs),
    Speak(SpeakArgs),
    Styles(StylesArgs),
    Models(ModelsArgs),
    SystemInfo(SystemInfoArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct PitchArgs {
    #[arg(value_name = "IDEA", help = "One-line idea to pitch")]
    pub idea: String,

    #[arg(long, value_enum, default_value_t = Style::Startup, help = "Pitch style")]
    pub style: Style,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100), help = "Intensity dial, 0-100")]
    pub intensity: Option<u8>,

    #[arg(long, value_name = "PATH", help = "Save audio to file")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Save audio under a timestamped name in the current directory")]
    pub save: bool,

    #[arg(long, help = "Play the generated audio")]
    pub play: bool,
}

#[derive(Args, Debug)]
pub struct ScriptArgs {
    #[arg(value_name = "IDEA", help = "One-line idea to pitch")]
    pub idea: String,

    #[arg(long, value_enum, default_value_t = Style::Startup, help = "Pitch style")]
    pub style: Style,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100), help = "Intensity dial, 0-100")]
    pub intensity: Option<u8>,
}

#[derive(Args, Debug)]
pub struct SpeakArgs {
    #[arg(value_name = "TEXT", help = "Text to synthesize")]
    pub text: String,

    #[arg(long, value_enum, default_value_t = Style::Startup, help = "Style that picks the voice")]
    pub style: Style,

    #[arg(long, value_name = "PATH", help = "Save audio to file")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Play the generated audio")]
    pub play: bool,
}

#[derive(Args, Debug)]
pub struct StylesArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SystemInfoArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, help = "Show current config as JSON")]
    pub show: bool,

    #[arg(long, help = "Create default config file")]
    pub init: bool,

    #[arg(long, help = "Validate configuration")]
    pub validate: bool,
}

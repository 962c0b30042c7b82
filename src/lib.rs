pub mod audio;
pub mod cli;
pub mod config;
pub mod gemini;
pub mod pipeline;
pub mod script;
pub mod style;
pub mod system;
pub mod tts;

use anyhow::Context;
use cli::{Cli, Commands};
use config::Config;
use gemini::http::{GeminiClient, GeminiClientConfig};
use gemini::GenerativeBackend;
use std::path::{Path, PathBuf};
use style::Style;
use tts::AudioResult;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Pitch(args) => pitch(args).await,
        Commands::Script(args) => script_cmd(args).await,
        Commands::Speak(args) => speak(args).await,
        Commands::Styles(args) => styles(args),
        Commands::Models(args) => models(args).await,
        Commands::SystemInfo(args) => system_info(args),
        Commands::Config(args) => config_cmd(args),
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn client(config: &Config) -> anyhow::Result<GeminiClient> {
    GeminiClient::new(GeminiClientConfig::from_config(config)).context("build HTTP client")
}

async fn pitch(args: cli::PitchArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    // fail before touching the network
    pipeline::validate_idea(&args.idea)?;

    let backend = client(&config)?;
    let speaker = tts::provider::select_speaker(&config.speech);

    let pitch = pipeline::generate_pitch(
        &backend,
        speaker.as_ref(),
        &config,
        &args.idea,
        args.style,
        args.intensity,
    )
    .await?;

    println!("{}", pitch.script);

    let output = match (args.output, args.save) {
        (Some(path), _) => Some(path),
        (None, true) => Some(pipeline::default_output_name(&chrono::Local::now())),
        (None, false) => None,
    };
    finish_audio(&pitch.audio, output.as_deref(), args.play, config.volume).await
}

async fn script_cmd(args: cli::ScriptArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    let idea = pipeline::validate_idea(&args.idea)?;
    let intensity = pipeline::validate_intensity(args.intensity)?;

    let backend = client(&config)?;
    let script = script::ScriptGenerator::new(&backend, &config.text)
        .generate(idea, args.style, intensity)
        .await?;

    println!("{script}");
    Ok(())
}

async fn speak(args: cli::SpeakArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    let text = args.text.trim();
    if text.is_empty() {
        anyhow::bail!("text must not be empty");
    }

    let backend = client(&config)?;
    let speaker = tts::provider::select_speaker(&config.speech);
    let audio = tts::SpeechSynthesizer::new(&backend, &config.speech, speaker.as_ref())
        .synthesize(text, args.style)
        .await;

    finish_audio(&audio, args.output.as_deref(), args.play, config.volume).await
}

async fn finish_audio(
    audio: &AudioResult,
    output: Option<&Path>,
    play: bool,
    volume: f32,
) -> anyhow::Result<()> {
    let synthesized = match audio {
        AudioResult::Synthesized(synthesized) => synthesized,
        AudioResult::FellBackToLocal => {
            eprintln!("Audio: spoken with on-device speech (nothing to save)");
            if let Some(path) = output {
                tracing::warn!(path = %path.display(), "no audio bytes to write after local fallback");
            }
            return Ok(());
        }
    };

    match audio::wav::describe(&synthesized.wav) {
        Ok(info) => eprintln!(
            "Audio: {:.1}s from {} (voice {})",
            info.duration_secs, synthesized.model, synthesized.voice
        ),
        Err(err) => tracing::warn!(error = ?err, "could not inspect generated audio"),
    }

    if let Some(path) = output {
        std::fs::write(path, &synthesized.wav)
            .with_context(|| format!("write audio to {}", path.display()))?;
        eprintln!("Saved {}", path.display());
    }

    if play {
        let wav = synthesized.wav.clone();
        tokio::task::spawn_blocking(move || audio::renderer::play_bytes(&wav, volume))
            .await
            .context("join playback task")??;
    }

    Ok(())
}

fn styles(args: cli::StylesArgs) -> anyhow::Result<()> {
    if args.json {
        let rows: Vec<serde_json::Value> = Style::ALL
            .iter()
            .map(|style| {
                serde_json::json!({
                    "style": style,
                    "label": style.label(),
                    "voice": style.voice(),
                    "instruction": style.instruction(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for style in Style::ALL {
        let name = serde_json::to_value(style)?;
        println!(
            "{:<14} {:<22} voice: {}",
            name.as_str().unwrap_or_default(),
            style.label(),
            style.voice()
        );
    }
    Ok(())
}

async fn models(args: cli::ModelsArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    let backend = client(&config)?;
    let listed = backend.list_models().await.context("list models")?;
    let selected = script::select_model(
        &listed,
        &config.text.preferred_models,
        &config.text.empty_listing_model,
    );

    if args.json {
        let out = serde_json::json!({
            "models": listed,
            "selected_text_model": selected,
            "speech_candidates": config.speech.candidates,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Models:");
    for model in &listed {
        let marker = if model.id() == selected { "*" } else { " " };
        println!(
            "{marker} {} [{}]",
            model.id(),
            model.supported_generation_methods.join(", ")
        );
    }
    println!("Text model: {selected}");
    println!("Speech candidates: {}", config.speech.candidates.join(" -> "));
    Ok(())
}

fn system_info(args: cli::SystemInfoArgs) -> anyhow::Result<()> {
    let config = Config::load().context("load config")?;
    let info = system::detect(config.resolved_api_key().is_some());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("OS: {}", info.os);
    println!("Arch: {}", info.arch);
    match info.speech_engine {
        Some(engine) => println!("On-device speech: {}", engine.program()),
        None => println!("On-device speech: none"),
    }
    match info.audio_player {
        Some(player) => println!("Audio player: {}", player.program()),
        None => println!("Audio player: none"),
    }
    println!("API key: {}", if info.api_key_set { "set" } else { "missing" });

    Ok(())
}

fn config_cmd(args: cli::ConfigArgs) -> anyhow::Result<()> {
    if args.init {
        let path = Config::init_default()?;
        println!("Initialized config at {}", path.display());
        return Ok(());
    }

    if args.show {
        let config = Config::load()?;
        println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    if args.validate {
        let config = Config::load()?;
        config.validate()?;
        println!("Config OK");
        return Ok(());
    }

    let path: PathBuf = Config::default_path()?;
    println!("{}", path.display());
    Ok(())
}

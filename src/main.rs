use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cameo::voice::{AudioOutput, Microphone, Synthesizer, Transcriber};
use cameo::{
    ChatResponder, Config, Error, ResponseResolver, TriggerTable, VoiceSession,
};

/// Cameo - personal voice bot: speak a question, hear an answer
#[derive(Parser)]
#[command(name = "cameo", version, about)]
struct Cli {
    /// Persona TOML file; omit for the built-in persona
    #[arg(short, long, env = "CAMEO_PERSONA")]
    persona: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable microphone and speech output (text-only session)
    #[arg(long, env = "CAMEO_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single question in text mode
    Ask {
        /// The question text
        text: String,
    },
    /// Speak a line of text (TTS smoke test)
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Show the persona's example questions
    Questions,
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,cameo=info",
        1 => "info,cameo=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let persona_path = cli.persona.as_deref();

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { text } => ask(persona_path.map(PathBuf::from), &text).await,
            Command::Say { text } => say(persona_path.map(PathBuf::from), &text).await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::Questions => questions(persona_path.map(PathBuf::from)),
            Command::Setup => cameo::setup::run_setup(),
        };
    }

    run_session(persona_path.map(PathBuf::from), cli.disable_voice).await
}

/// Build the resolver and fallback from configuration
fn build_session(config: &Config) -> anyhow::Result<VoiceSession> {
    let key = config.openai_key()?;
    let resolver = ResponseResolver::new(TriggerTable::new(&config.persona.replies));
    let fallback = ChatResponder::new(
        key,
        config.chat.api_base.clone(),
        config.chat.model.clone(),
        config.persona.system_prompt.clone(),
        config.chat.max_tokens,
    )?;
    Ok(VoiceSession::new(resolver, Box::new(fallback)))
}

/// Read one line from stdin, trimmed
fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Interactive conversation loop
#[allow(clippy::future_not_send)]
async fn run_session(persona: Option<PathBuf>, disable_voice: bool) -> anyhow::Result<()> {
    let config = Config::load_with_options(persona.as_deref(), disable_voice)?;
    let mut session = build_session(&config)?;
    let name = config.persona.name.clone();

    println!("{}", config.persona.intro());
    if !config.persona.example_questions.is_empty() {
        println!("\nExample questions you can ask:");
        for q in &config.persona.example_questions {
            println!("  - {q}");
        }
    }
    println!();

    let mut voice = if config.voice.enabled {
        let mic = Microphone::new()?;
        let transcriber = Transcriber::new(
            config.openai_key()?,
            config.chat.api_base.clone(),
            config.voice.stt_model.clone(),
        )?;
        let synthesizer = Synthesizer::new(
            config.openai_key()?,
            config.chat.api_base.clone(),
            config.voice.tts_model.clone(),
            config.voice.tts_voice.clone(),
            config.voice.tts_speed,
        )?;
        let output = AudioOutput::new()?;
        Some((mic, transcriber, synthesizer, output))
    } else {
        None
    };

    let prompt = if voice.is_some() {
        format!(
            "[Enter] record {}s, or type a question ('quit' to exit): ",
            config.voice.record_secs
        )
    } else {
        "You ('quit' to exit): ".to_string()
    };

    loop {
        let line = read_line(&prompt)?;
        if line == "quit" || line == "q" || line == "exit" {
            break;
        }

        let utterance = if line.is_empty() {
            let Some((mic, transcriber, _, _)) = voice.as_mut() else {
                continue;
            };
            println!("Recording for {} seconds... speak now!", config.voice.record_secs);
            let wav = mic
                .record_wav(Duration::from_secs(config.voice.record_secs))
                .await?;

            match transcriber.transcribe(&wav).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "transcription failed");
                    println!("Sorry, I couldn't transcribe that. Try again.");
                    continue;
                }
            }
        } else {
            line
        };

        if utterance.trim().is_empty() {
            println!("I didn't catch anything. Try again.");
            continue;
        }

        println!("You: {utterance}");

        let reply = match session.take_turn(&utterance).await {
            Ok(reply) => reply,
            Err(e @ Error::Upstream(_)) => {
                tracing::error!(error = %e, "fallback failed");
                println!("Sorry, I couldn't reach the answer service. Please try again.");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        println!("{name}: {reply}\n");

        if let Some((_, _, synthesizer, output)) = voice.as_mut() {
            match synthesizer.synthesize(&reply).await {
                Ok(mp3) => {
                    if let Err(e) = output.play_mp3(&mp3).await {
                        tracing::warn!(error = %e, "playback failed");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "synthesis failed"),
            }
        }
    }

    println!("Bye!");
    Ok(())
}

/// Answer a single question in text mode
async fn ask(persona: Option<PathBuf>, text: &str) -> anyhow::Result<()> {
    let config = Config::load_with_options(persona.as_deref(), true)?;
    let mut session = build_session(&config)?;

    let reply = session.take_turn(text).await?;
    println!("{reply}");
    Ok(())
}

/// Synthesize and play a line of text
#[allow(clippy::future_not_send)]
async fn say(persona: Option<PathBuf>, text: &str) -> anyhow::Result<()> {
    println!("Synthesizing: \"{text}\"");

    let config = Config::load(persona.as_deref())?;
    let synthesizer = Synthesizer::new(
        config.openai_key()?,
        config.chat.api_base.clone(),
        config.voice.tts_model.clone(),
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
    )?;

    let mp3 = synthesizer.synthesize(text).await?;
    println!("Got {} bytes of audio, playing...", mp3.len());

    let mut output = AudioOutput::new()?;
    output.play_mp3(&mp3).await?;

    println!("Done. If you heard the speech, TTS is working.");
    Ok(())
}

/// Test microphone input with a level meter
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds. Speak now!\n");

    let mut mic = Microphone::new()?;
    mic.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = mic.peek_samples();
        let rms = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (rms * 100.0).min(40.0) as usize;
        let meter = "#".repeat(meter_len);

        println!("[{:2}s] rms {rms:.4}  peak {peak:.4}  |{meter}", i + 1);
        mic.clear();
    }

    mic.stop();

    println!("\nIf the meter moved while you spoke, the microphone works.");
    println!("If it stayed at zero, check your input device and levels.");
    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a short tone
#[allow(clippy::future_not_send)]
async fn test_speaker() -> anyhow::Result<()> {
    println!("Playing a 440Hz tone for 2 seconds...");

    let sample_rate = 24000u32;
    let frequency = 440.0f32;
    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..sample_rate * 2)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    let mut output = AudioOutput::new()?;
    output.play(samples).await?;

    println!("If you heard the tone, your speakers work.");
    Ok(())
}

/// Print the persona's example questions
fn questions(persona: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load(persona.as_deref())?;

    if config.persona.example_questions.is_empty() {
        println!("The {} persona has no example questions.", config.persona.name);
        return Ok(());
    }

    println!("Example questions for {}:", config.persona.name);
    for q in &config.persona.example_questions {
        println!("  - {q}");
    }
    Ok(())
}

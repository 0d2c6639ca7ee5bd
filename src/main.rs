use anyhow::{Context, Result};
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use textgist::config::AppConfig;
use textgist::corrections::{CorrectionConfig, Corrector};
use textgist::optimizer::Style;
use textgist::pipeline::{
    self, AiOptions, AiTextRequest, AudioInput, OptimizeRequest, ReadyResponse, SummarizeRequest,
};
use textgist::reader::{InputReader, ReaderConfig};
use textgist::stt::{is_engine_unavailable, SttService, Transcriber};
use textgist::summarizer::{Strategy, DEFAULT_MAX_SENTENCES};

/// Exit status when no speech-to-text engine is installed
const EXIT_ENGINE_UNAVAILABLE: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "textgist")]
#[command(about = "Extractive summarization, style optimization and speech-to-text for short texts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick the most representative sentences of a document
    Summarize {
        /// Maximum sentences in the summary (1-20)
        #[arg(long, default_value_t = DEFAULT_MAX_SENTENCES, value_parser = clap::value_parser!(u64).range(1..=20).map(|n| n as usize))]
        max_sentences: usize,

        /// Selection strategy: lead or frequency
        #[arg(long, default_value_t = Strategy::Frequency)]
        strategy: Strategy,

        /// Text file to read; stdin when omitted
        input: Option<PathBuf>,
    },

    /// Rewrite a document as concise, formal or bullet text
    Optimize {
        /// Output style: concise, formal or bullet
        #[arg(long, default_value_t = Style::Concise)]
        style: Style,

        /// Language code of the text; detected when omitted
        #[arg(long)]
        language: Option<String>,

        /// Text file to read; stdin when omitted
        input: Option<PathBuf>,
    },

    /// Transcribe an audio file ("-" reads stdin)
    Stt {
        audio: PathBuf,

        #[command(flatten)]
        speech: SpeechArgs,
    },

    /// Summarize and optionally optimize text or transcribed audio
    Ai {
        /// Transcribe this audio file ("-" for stdin) instead of reading text
        #[arg(long, conflicts_with_all = ["input", "request"])]
        audio: Option<PathBuf>,

        /// JSON request file ({"text": ..., "summarize": ..., ...}); "-" for stdin.
        /// Options come from the file, so the text option flags are rejected
        #[arg(
            long,
            conflicts_with_all = [
                "input",
                "no_summarize",
                "optimize",
                "max_sentences",
                "strategy",
                "style",
                "language",
                "initial_prompt",
            ]
        )]
        request: Option<PathBuf>,

        /// Skip summarization
        #[arg(long)]
        no_summarize: bool,

        /// Also optimize the summary (or the text when no summary is produced)
        #[arg(long)]
        optimize: bool,

        #[arg(long, default_value_t = DEFAULT_MAX_SENTENCES, value_parser = clap::value_parser!(u64).range(1..=20).map(|n| n as usize))]
        max_sentences: usize,

        #[arg(long, default_value_t = Strategy::Frequency)]
        strategy: Strategy,

        #[arg(long, default_value_t = Style::Concise)]
        style: Style,

        #[command(flatten)]
        speech: SpeechArgs,

        /// Text file to read; stdin when omitted
        input: Option<PathBuf>,
    },

    /// Warm up the speech-to-text engine and report readiness
    Ready,
}

#[derive(Args, Debug)]
struct SpeechArgs {
    /// Language code passed to the engine and echoed in the response
    #[arg(long)]
    language: Option<String>,

    /// Prompt that biases transcription toward expected vocabulary
    #[arg(long)]
    initial_prompt: Option<String>,
}

/// `-` selects stdin
fn input_path(path: &Path) -> Option<&Path> {
    (path != Path::new("-")).then_some(path)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{json}");
    Ok(())
}

/// Audio always goes through the size-limited reader and is staged for the engine
async fn read_audio(reader: &InputReader, path: &Path) -> Result<Vec<u8>> {
    reader.read_bytes(input_path(path)).await
}

fn build_corrector(config: CorrectionConfig) -> Corrector {
    let corrector = Corrector::new(config);
    debug!(enabled = corrector.is_enabled(), "Transcript corrections");
    corrector
}

fn audio_input<'a>(path: &'a Path, data: &'a [u8]) -> AudioInput<'a> {
    AudioInput::Bytes {
        data,
        filename: input_path(path)
            .and_then(Path::file_name)
            .and_then(|name| name.to_str()),
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let reader = InputReader::new(ReaderConfig {
        max_bytes: config.max_input_bytes(),
        ..ReaderConfig::default()
    });

    match cli.command {
        Command::Summarize { max_sentences, strategy, input } => {
            let text = reader.read_text(input.as_deref()).await?;
            let response = pipeline::summarize_text(&SummarizeRequest {
                text,
                max_sentences,
                strategy,
            })?;
            print_json(&response)
        }

        Command::Optimize { style, language, input } => {
            let text = reader.read_text(input.as_deref()).await?;
            let response = pipeline::optimize_text(&OptimizeRequest { text, style, language })?;
            print_json(&response)
        }

        Command::Stt { audio, speech } => {
            let stt = SttService::new(config.stt);
            let corrector = build_corrector(config.corrections);
            let data = read_audio(&reader, &audio).await?;
            let response = pipeline::transcribe(
                &stt,
                &corrector,
                audio_input(&audio, &data),
                speech.language.as_deref(),
                speech.initial_prompt.as_deref(),
            )
            .await?;
            print_json(&response)
        }

        Command::Ai {
            audio,
            request,
            no_summarize,
            optimize,
            max_sentences,
            strategy,
            style,
            speech,
            input,
        } => {
            if let Some(request) = request {
                let raw = reader.read_text(input_path(&request)).await?;
                let request: AiTextRequest =
                    serde_json::from_str(&raw).context("Malformed AI request JSON")?;
                return print_json(&pipeline::run_text(request)?);
            }

            let options = AiOptions {
                summarize: !no_summarize,
                optimize,
                max_sentences,
                strategy,
                style,
                language: speech.language,
            };

            match audio {
                Some(audio) => {
                    let stt = SttService::new(config.stt);
                    let corrector = build_corrector(config.corrections);
                    let data = read_audio(&reader, &audio).await?;
                    let response = pipeline::run_audio(
                        &stt,
                        &corrector,
                        audio_input(&audio, &data),
                        &options,
                        speech.initial_prompt.as_deref(),
                    )
                    .await?;
                    print_json(&response)
                }
                None => {
                    let text = reader.read_text(input.as_deref()).await?;
                    print_json(&pipeline::run_text(AiTextRequest { text, options })?)
                }
            }
        }

        Command::Ready => {
            let stt = SttService::new(config.stt);
            let ready = stt.warm_up().await;
            print_json(&ReadyResponse {
                ready,
                engine: stt.name().map(str::to_string),
                available: stt.available(),
            })
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // WHY: stdout carries the JSON response, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    let result = match AppConfig::from_env() {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.context("Invalid configuration")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            if is_engine_unavailable(&e) {
                ExitCode::from(EXIT_ENGINE_UNAVAILABLE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

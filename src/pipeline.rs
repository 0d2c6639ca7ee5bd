// Request and response records plus the unified text/audio flow behind every CLI command

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::corrections::Corrector;
use crate::language::classify;
use crate::optimizer::{optimize, Style};
use crate::stt::{transcribe_bytes, EngineUnavailable, Transcriber, Transcript};
use crate::summarizer::{
    summarize, validate_max_sentences, Strategy, DEFAULT_MAX_SENTENCES,
};

fn default_max_sentences() -> usize {
    DEFAULT_MAX_SENTENCES
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Selected sentences joined with single spaces
    pub summary: String,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub text: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttResponse {
    pub text: String,
    pub language: Option<String>,
    pub engine: Option<String>,
}

/// Options shared by the text and audio forms of the unified operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiOptions {
    #[serde(default = "default_true")]
    pub summarize: bool,
    #[serde(default)]
    pub optimize: bool,
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub style: Style,
    /// Caller language; used for optimization and echoed in the response
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for AiOptions {
    fn default() -> Self {
        Self {
            summarize: true,
            optimize: false,
            max_sentences: DEFAULT_MAX_SENTENCES,
            strategy: Strategy::default(),
            style: Style::default(),
            language: None,
        }
    }
}

/// Text form of the unified operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTextRequest {
    pub text: String,
    #[serde(flatten)]
    pub options: AiOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub summary: Option<String>,
    pub optimized: Option<String>,
    pub language: Option<String>,
    pub engine: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Engine warmed up successfully
    pub ready: bool,
    pub engine: Option<String>,
    /// An engine is installed, whether or not warm-up succeeded
    pub available: bool,
}

/// Audio handed to the pipeline: a file on disk or an in-memory upload
#[derive(Debug, Clone, Copy)]
pub enum AudioInput<'a> {
    File(&'a Path),
    Bytes {
        data: &'a [u8],
        /// Original file name, used only for its extension
        filename: Option<&'a str>,
    },
}

fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("text must not be empty");
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn summarize_text(request: &SummarizeRequest) -> Result<SummarizeResponse> {
    ensure_text(&request.text)?;
    let max_sentences = validate_max_sentences(request.max_sentences)?;
    let sentences = summarize(&request.text, max_sentences, request.strategy);
    Ok(SummarizeResponse {
        summary: sentences.join(" "),
        sentences,
    })
}

pub fn optimize_text(request: &OptimizeRequest) -> Result<OptimizeResponse> {
    ensure_text(&request.text)?;
    Ok(OptimizeResponse {
        result: optimize(&request.text, request.style, non_empty(request.language.as_deref())),
    })
}

/// Summary and optimization over already validated text
///
/// Optimization runs on the summary when one was produced and is non-empty,
/// otherwise on the full text. The response language is the caller's, else
/// `detected`.
fn process(text: String, options: &AiOptions, detected: Option<String>) -> AiResponse {
    let language = non_empty(options.language.as_deref());

    let summary = options
        .summarize
        .then(|| summarize(&text, options.max_sentences, options.strategy).join(" "));

    let optimized = options.optimize.then(|| {
        let base = summary.as_deref().filter(|s| !s.is_empty()).unwrap_or(&text);
        optimize(base, options.style, language)
    });

    AiResponse {
        summary,
        optimized,
        language: language.map(str::to_string).or(detected),
        engine: None,
        text,
    }
}

/// Unified operation over text input
pub fn run_text(request: AiTextRequest) -> Result<AiResponse> {
    ensure_text(&request.text)?;
    validate_max_sentences(request.options.max_sentences)?;

    let detected = classify(&request.text).code().to_string();
    Ok(process(request.text, &request.options, Some(detected)))
}

async fn transcribe_input<T: Transcriber>(
    engine: &T,
    audio: AudioInput<'_>,
    language: Option<&str>,
    initial_prompt: Option<&str>,
) -> Result<Transcript> {
    if !engine.available() {
        return Err(EngineUnavailable.into());
    }
    let transcript = match audio {
        AudioInput::File(path) => engine.transcribe(path, language, initial_prompt).await,
        AudioInput::Bytes { data, filename } => {
            transcribe_bytes(engine, data, filename, language, initial_prompt).await
        }
    };
    transcript.context("audio transcription failed")
}

/// Transcribe audio and apply term corrections for the transcript language
pub async fn transcribe<T: Transcriber>(
    engine: &T,
    corrector: &Corrector,
    audio: AudioInput<'_>,
    language: Option<&str>,
    initial_prompt: Option<&str>,
) -> Result<SttResponse> {
    let language = non_empty(language);
    let transcript = transcribe_input(engine, audio, language, non_empty(initial_prompt)).await?;
    let text = corrector.apply(&transcript.text, transcript.language.as_deref().unwrap_or("en"));

    info!(
        engine = engine.name().unwrap_or("none"),
        language = transcript.language.as_deref().unwrap_or("unknown"),
        "Transcribed audio"
    );

    Ok(SttResponse {
        text,
        language: transcript.language,
        engine: engine.name().map(str::to_string),
    })
}

/// Unified operation over audio input: transcribe, correct, then summarize
/// and optimize the transcript
///
/// An empty transcript is not an error here.
pub async fn run_audio<T: Transcriber>(
    engine: &T,
    corrector: &Corrector,
    audio: AudioInput<'_>,
    options: &AiOptions,
    initial_prompt: Option<&str>,
) -> Result<AiResponse> {
    validate_max_sentences(options.max_sentences)?;

    let stt = transcribe(
        engine,
        corrector,
        audio,
        options.language.as_deref(),
        initial_prompt,
    )
    .await?;

    let mut response = process(stt.text, options, stt.language);
    response.engine = stt.engine;
    Ok(response)
}

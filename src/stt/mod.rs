// Speech-to-text bridge: a caller-owned service wrapping an external whisper CLI
// Constructed explicitly at startup and passed to whoever needs transcription

pub mod whisper;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crate::config::SttConfig;

pub use whisper::{EngineKind, WhisperEngine};

/// Text and language produced by one transcription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub language: Option<String>,
}

/// Raised when no speech-to-text engine is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineUnavailable;

impl fmt::Display for EngineUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            "No STT engine available. Install whisper-ctranslate2 (faster-whisper) or openai-whisper.",
        )
    }
}

impl std::error::Error for EngineUnavailable {}

/// Check whether an error chain is the "no engine installed" case
pub fn is_engine_unavailable(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<EngineUnavailable>())
}

/// Speech-to-text engine seam
#[allow(async_fn_in_trait)]
pub trait Transcriber {
    /// Engine name reported in responses, `None` when unavailable
    fn name(&self) -> Option<&str>;

    fn available(&self) -> bool;

    /// Transcribe an audio file; failures are reported, never retried
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
        initial_prompt: Option<&str>,
    ) -> Result<Transcript>;
}

/// Caller-owned speech-to-text service
#[derive(Debug)]
pub struct SttService {
    engine: Option<WhisperEngine>,
    ready: AtomicBool,
}

impl SttService {
    /// Probe for an installed engine, preferring faster-whisper
    pub fn new(config: SttConfig) -> Self {
        let engine = WhisperEngine::detect(config);
        match &engine {
            Some(engine) => info!(engine = engine.kind().name(), binary = %engine.binary().display(), "STT engine detected"),
            None => warn!("No STT engine found on PATH"),
        }
        Self::with_engine(engine)
    }

    /// Wrap an already constructed engine (or none)
    pub fn with_engine(engine: Option<WhisperEngine>) -> Self {
        Self {
            engine,
            ready: AtomicBool::new(false),
        }
    }

    /// Prepare the engine before the first request and record readiness
    ///
    /// faster-whisper is probed by running its CLI; openai-whisper stays lazy
    /// and is ready as soon as it is installed.
    pub async fn warm_up(&self) -> bool {
        let ready = match &self.engine {
            None => false,
            Some(engine) => match engine.probe().await {
                Ok(()) => true,
                Err(e) => {
                    warn!("STT warm-up failed: {e:#}");
                    false
                }
            },
        };
        self.ready.store(ready, Ordering::SeqCst);
        ready
    }

    /// Result of the last warm-up
    pub fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn engine(&self) -> Option<&WhisperEngine> {
        self.engine.as_ref()
    }
}

impl Transcriber for SttService {
    fn name(&self) -> Option<&str> {
        self.engine.as_ref().map(|engine| engine.kind().name())
    }

    fn available(&self) -> bool {
        self.engine.is_some()
    }

    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
        initial_prompt: Option<&str>,
    ) -> Result<Transcript> {
        let engine = self.engine.as_ref().ok_or(EngineUnavailable)?;
        engine.transcribe(audio, language, initial_prompt).await
    }
}

/// Transcribe audio held in memory by staging it in a temporary file
///
/// The file keeps the upload's extension (default `.wav`) so the engine can
/// pick a decoder, and is removed when the call returns.
pub async fn transcribe_bytes<T: Transcriber>(
    engine: &T,
    audio: &[u8],
    filename: Option<&str>,
    language: Option<&str>,
    initial_prompt: Option<&str>,
) -> Result<Transcript> {
    if !engine.available() {
        return Err(EngineUnavailable.into());
    }

    let suffix = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".wav".to_string());

    let staged = tempfile::Builder::new()
        .prefix("textgist-audio-")
        .suffix(&suffix)
        .tempfile()
        .context("Failed to create temporary audio file")?;
    tokio::fs::write(staged.path(), audio)
        .await
        .context("Failed to stage audio for transcription")?;

    engine.transcribe(staged.path(), language, initial_prompt).await
}

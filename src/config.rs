// Startup configuration read once from the environment and passed by reference
// Nothing below reads the environment mid-request

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use crate::corrections::CorrectionConfig;

/// Default input size limit in megabytes
pub const DEFAULT_MAX_INPUT_MB: usize = 25;

/// Whisper decoding task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SttTask {
    #[default]
    Transcribe,
    Translate,
}

impl SttTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            SttTask::Transcribe => "transcribe",
            SttTask::Translate => "translate",
        }
    }
}

impl FromStr for SttTask {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transcribe" => Ok(SttTask::Transcribe),
            "translate" => Ok(SttTask::Translate),
            other => bail!("Unknown STT task '{other}' (expected transcribe or translate)"),
        }
    }
}

/// Speech-to-text engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct SttConfig {
    /// Explicit path to the faster-whisper CLI (`whisper-ctranslate2`); probed on PATH when unset
    pub faster_whisper_bin: Option<PathBuf>,
    /// Explicit path to the openai-whisper CLI (`whisper`); probed on PATH when unset
    pub openai_whisper_bin: Option<PathBuf>,
    /// faster-whisper model size (default `base`)
    pub model: String,
    /// faster-whisper compute type (default `int8`)
    pub compute_type: String,
    /// faster-whisper device (default `cpu`)
    pub device: String,
    pub beam_size: u32,
    pub best_of: u32,
    pub vad_filter: bool,
    pub temperature: f32,
    pub no_speech_threshold: f32,
    pub compression_ratio_threshold: f32,
    pub condition_on_previous_text: bool,
    /// Language forced on every faster-whisper call unless the request names one
    pub fixed_language: Option<String>,
    pub task: SttTask,
    /// Biasing prompt used when the request has none (faster-whisper only)
    pub initial_prompt: Option<String>,
    /// openai-whisper model size (default `base`)
    pub openai_model: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            faster_whisper_bin: None,
            openai_whisper_bin: None,
            model: "base".to_string(),
            compute_type: "int8".to_string(),
            device: "cpu".to_string(),
            beam_size: 5,
            best_of: 5,
            vad_filter: true,
            temperature: 0.0,
            no_speech_threshold: 0.6,
            compression_ratio_threshold: 2.4,
            condition_on_previous_text: true,
            fixed_language: None,
            task: SttTask::Transcribe,
            initial_prompt: None,
            openai_model: "base".to_string(),
        }
    }
}

impl SttConfig {
    /// Reject settings the engine would fail on at first use
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            bail!("FAST_WHISPER_MODEL must not be empty");
        }
        if self.openai_model.trim().is_empty() {
            bail!("OPENAI_WHISPER_MODEL must not be empty");
        }
        if self.beam_size == 0 {
            bail!("FAST_WHISPER_BEAM_SIZE must be at least 1");
        }
        if self.best_of == 0 {
            bail!("FAST_WHISPER_BEST_OF must be at least 1");
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            bail!("FAST_WHISPER_TEMPERATURE must be a non-negative number, got {}", self.temperature);
        }
        if !(0.0..=1.0).contains(&self.no_speech_threshold) {
            bail!(
                "FAST_WHISPER_NO_SPEECH_THRESHOLD must be within [0, 1], got {}",
                self.no_speech_threshold
            );
        }
        if !self.compression_ratio_threshold.is_finite() || self.compression_ratio_threshold <= 0.0 {
            bail!(
                "FAST_WHISPER_COMPRESSION_RATIO_THRESHOLD must be positive, got {}",
                self.compression_ratio_threshold
            );
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub stt: SttConfig,
    pub corrections: CorrectionConfig,
    /// Largest accepted text or audio input, in megabytes
    pub max_input_mb: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stt: SttConfig::default(),
            corrections: CorrectionConfig::default(),
            max_input_mb: DEFAULT_MAX_INPUT_MB,
        }
    }
}

/// Truthy values accepted for boolean switches
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Typed access to a key/value source with defaults for absent or blank keys
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed, non-empty value for `key`
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Raw value for `key`, untrimmed, empty treated as absent
    fn get_raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, |v| parse_bool(&v))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(value) => value
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("Invalid value for {key}: '{value}'")),
            None => Ok(default),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate configuration from an arbitrary key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };
        let defaults = SttConfig::default();

        let stt = SttConfig {
            faster_whisper_bin: env.get("STT_FASTER_WHISPER_BIN").map(PathBuf::from),
            openai_whisper_bin: env.get("STT_OPENAI_WHISPER_BIN").map(PathBuf::from),
            model: env.string("FAST_WHISPER_MODEL", &defaults.model),
            compute_type: env.string("FAST_WHISPER_COMPUTE", &defaults.compute_type),
            device: env.string("FAST_WHISPER_DEVICE", &defaults.device),
            beam_size: env.parsed("FAST_WHISPER_BEAM_SIZE", defaults.beam_size)?,
            best_of: env.parsed("FAST_WHISPER_BEST_OF", defaults.best_of)?,
            vad_filter: env.flag("FAST_WHISPER_VAD_FILTER", defaults.vad_filter),
            temperature: env.parsed("FAST_WHISPER_TEMPERATURE", defaults.temperature)?,
            no_speech_threshold: env.parsed("FAST_WHISPER_NO_SPEECH_THRESHOLD", defaults.no_speech_threshold)?,
            compression_ratio_threshold: env.parsed(
                "FAST_WHISPER_COMPRESSION_RATIO_THRESHOLD",
                defaults.compression_ratio_threshold,
            )?,
            condition_on_previous_text: env.flag(
                "FAST_WHISPER_CONDITION_ON_PREV",
                defaults.condition_on_previous_text,
            ),
            fixed_language: env.get("FAST_WHISPER_LANGUAGE"),
            task: env.parsed("FAST_WHISPER_TASK", defaults.task)?,
            initial_prompt: env.get_raw("FAST_WHISPER_INITIAL_PROMPT"),
            openai_model: env.string("OPENAI_WHISPER_MODEL", &defaults.openai_model),
        };
        stt.validate()?;

        let corrections = CorrectionConfig {
            enabled: env.flag("TEXT_CORRECT_ENABLE", false),
            zh: CorrectionConfig::load_map(
                env.get_raw("TEXT_CORRECT_MAP_ZH").as_deref(),
                env.get_raw("TEXT_CORRECT_PAIRS_ZH").as_deref(),
            ),
            en: CorrectionConfig::load_map(
                env.get_raw("TEXT_CORRECT_MAP_EN").as_deref(),
                env.get_raw("TEXT_CORRECT_PAIRS_EN").as_deref(),
            ),
        };

        // WHY: a malformed size limit falls back to the default rather than blocking startup
        let max_input_mb = match env.parsed::<usize>("MAX_UPLOAD_MB", DEFAULT_MAX_INPUT_MB) {
            Ok(0) => {
                warn!("MAX_UPLOAD_MB must be positive; using {DEFAULT_MAX_INPUT_MB}");
                DEFAULT_MAX_INPUT_MB
            }
            Ok(mb) => mb,
            Err(e) => {
                warn!("{e:#}; using {DEFAULT_MAX_INPUT_MB}");
                DEFAULT_MAX_INPUT_MB
            }
        };

        Ok(Self {
            stt,
            corrections,
            max_input_mb,
        })
    }

    /// Input limit in bytes
    pub fn max_input_bytes(&self) -> usize {
        self.max_input_mb.saturating_mul(1024 * 1024)
    }
}

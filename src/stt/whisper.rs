// Whisper command-line engines driven as child processes
// Each call writes JSON into its own temporary directory, removed on return

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::Transcript;
use crate::config::SttConfig;

/// Supported whisper CLIs, in detection preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// faster-whisper through `whisper-ctranslate2`
    FasterWhisper,
    /// The reference `whisper` CLI from openai-whisper
    OpenAiWhisper,
}

impl EngineKind {
    /// Name reported to callers
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::FasterWhisper => "faster-whisper",
            EngineKind::OpenAiWhisper => "openai-whisper",
        }
    }

    /// Executable looked up on PATH when no explicit binary is configured
    pub fn default_binary(&self) -> &'static str {
        match self {
            EngineKind::FasterWhisper => "whisper-ctranslate2",
            EngineKind::OpenAiWhisper => "whisper",
        }
    }
}

/// Shape of the JSON file both CLIs write with `--output_format json`
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// Search a PATH-style list of directories for an executable called `name`
pub fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Search the process PATH for `name`
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    find_in_path(name, &path_var)
}

/// A resolved whisper CLI plus the settings it runs with
#[derive(Debug, Clone)]
pub struct WhisperEngine {
    kind: EngineKind,
    binary: PathBuf,
    config: SttConfig,
}

impl WhisperEngine {
    pub fn new(kind: EngineKind, binary: impl Into<PathBuf>, config: SttConfig) -> Self {
        Self {
            kind,
            binary: binary.into(),
            config,
        }
    }

    /// Pick the first installed engine: faster-whisper, then openai-whisper
    ///
    /// An explicitly configured binary is used when it is executable; otherwise
    /// the engine's default executable is looked up on PATH.
    pub fn detect(config: SttConfig) -> Option<Self> {
        let candidates = [
            (EngineKind::FasterWhisper, config.faster_whisper_bin.clone()),
            (EngineKind::OpenAiWhisper, config.openai_whisper_bin.clone()),
        ];

        for (kind, configured) in candidates {
            if let Some(path) = configured {
                if is_executable(&path) {
                    return Some(Self::new(kind, path, config));
                }
                warn!(engine = kind.name(), path = %path.display(), "Configured STT binary is not executable");
            }
            if let Some(path) = find_executable(kind.default_binary()) {
                return Some(Self::new(kind, path, config));
            }
        }
        None
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Language passed to the CLI: the request's, else the configured fixed
    /// language (faster-whisper only)
    fn effective_language<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        let requested = requested.filter(|lang| !lang.is_empty());
        match self.kind {
            EngineKind::FasterWhisper => requested.or(self.config.fixed_language.as_deref()),
            EngineKind::OpenAiWhisper => requested,
        }
    }

    /// Biasing prompt: the request's, else the configured one (faster-whisper only)
    fn effective_prompt<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        let requested = requested.filter(|prompt| !prompt.is_empty());
        match self.kind {
            EngineKind::FasterWhisper => requested.or(self.config.initial_prompt.as_deref()),
            EngineKind::OpenAiWhisper => requested,
        }
    }

    /// Command-line arguments for transcribing `audio` into `out_dir`
    pub fn build_args(
        &self,
        audio: &Path,
        out_dir: &Path,
        language: Option<&str>,
        initial_prompt: Option<&str>,
    ) -> Vec<OsString> {
        let config = &self.config;
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |flag: &str, value: &dyn AsRef<OsStr>| {
            args.push(flag.into());
            args.push(value.as_ref().to_os_string());
        };
        let cli_bool = |value: bool| if value { "True" } else { "False" };

        match self.kind {
            EngineKind::FasterWhisper => {
                push("--model", &config.model);
                push("--device", &config.device);
                push("--compute_type", &config.compute_type);
                push("--task", &config.task.as_str());
                push("--beam_size", &config.beam_size.to_string());
                push("--best_of", &config.best_of.to_string());
                push("--vad_filter", &cli_bool(config.vad_filter));
                push("--temperature", &config.temperature.to_string());
                push("--no_speech_threshold", &config.no_speech_threshold.to_string());
                push(
                    "--compression_ratio_threshold",
                    &config.compression_ratio_threshold.to_string(),
                );
                push(
                    "--condition_on_previous_text",
                    &cli_bool(config.condition_on_previous_text),
                );
            }
            EngineKind::OpenAiWhisper => {
                push("--model", &config.openai_model);
            }
        }

        push("--output_format", &"json");
        push("--output_dir", &out_dir);
        if let Some(language) = self.effective_language(language) {
            push("--language", &language);
        }
        if let Some(prompt) = self.effective_prompt(initial_prompt) {
            push("--initial_prompt", &prompt);
        }

        args.push(audio.as_os_str().to_os_string());
        args
    }

    /// Check that the engine can be launched
    ///
    /// faster-whisper is run once with `--help`; openai-whisper loads its model
    /// lazily on first use, so only its presence is checked.
    pub async fn probe(&self) -> Result<()> {
        match self.kind {
            EngineKind::FasterWhisper => {
                let status = Command::new(&self.binary)
                    .arg("--help")
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .await
                    .with_context(|| format!("Failed to launch {}", self.binary.display()))?;
                if !status.success() {
                    bail!("{} --help exited with {status}", self.binary.display());
                }
                info!(engine = self.kind.name(), "STT engine warmed up");
            }
            EngineKind::OpenAiWhisper => {
                if !is_executable(&self.binary) {
                    bail!("{} is not executable", self.binary.display());
                }
                debug!(engine = self.kind.name(), "STT engine loads lazily");
            }
        }
        Ok(())
    }

    /// Run the CLI on `audio` and read back its JSON transcript
    pub async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
        initial_prompt: Option<&str>,
    ) -> Result<Transcript> {
        let start_time = Instant::now();
        let stem = audio
            .file_stem()
            .with_context(|| format!("Audio path has no file name: {}", audio.display()))?;

        let out_dir = tempfile::Builder::new()
            .prefix("textgist-stt-")
            .tempdir()
            .context("Failed to create STT output directory")?;

        let args = self.build_args(audio, out_dir.path(), language, initial_prompt);
        debug!(engine = self.kind.name(), ?args, "Launching STT engine");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to launch {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.kind.name(),
                output.status,
                stderr.trim()
            );
        }

        let mut file_name = stem.to_os_string();
        file_name.push(".json");
        let json_path = out_dir.path().join(file_name);
        let raw = tokio::fs::read_to_string(&json_path)
            .await
            .with_context(|| format!("Failed to read STT output {}", json_path.display()))?;
        let parsed: WhisperOutput = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed STT output {}", json_path.display()))?;

        let language = self
            .effective_language(language)
            .map(str::to_string)
            .or(parsed.language);

        info!(
            engine = self.kind.name(),
            chars = parsed.text.chars().count(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Transcription finished"
        );

        Ok(Transcript {
            text: parsed.text.trim().to_string(),
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SttTask;

    fn arg_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn value_after(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    }

    #[test]
    fn test_engine_names() {
        assert_eq!(EngineKind::FasterWhisper.name(), "faster-whisper");
        assert_eq!(EngineKind::FasterWhisper.default_binary(), "whisper-ctranslate2");
        assert_eq!(EngineKind::OpenAiWhisper.name(), "openai-whisper");
        assert_eq!(EngineKind::OpenAiWhisper.default_binary(), "whisper");
    }

    #[test]
    fn test_faster_whisper_args() {
        let config = SttConfig {
            vad_filter: false,
            task: SttTask::Translate,
            fixed_language: Some("zh".to_string()),
            initial_prompt: Some("glossary".to_string()),
            ..SttConfig::default()
        };
        let engine = WhisperEngine::new(EngineKind::FasterWhisper, "whisper-ctranslate2", config);
        let args = arg_strings(&engine.build_args(
            Path::new("/tmp/in.wav"),
            Path::new("/tmp/out"),
            None,
            None,
        ));

        assert_eq!(value_after(&args, "--model").as_deref(), Some("base"));
        assert_eq!(value_after(&args, "--compute_type").as_deref(), Some("int8"));
        assert_eq!(value_after(&args, "--task").as_deref(), Some("translate"));
        assert_eq!(value_after(&args, "--beam_size").as_deref(), Some("5"));
        assert_eq!(value_after(&args, "--vad_filter").as_deref(), Some("False"));
        assert_eq!(value_after(&args, "--condition_on_previous_text").as_deref(), Some("True"));
        assert_eq!(value_after(&args, "--output_format").as_deref(), Some("json"));
        assert_eq!(value_after(&args, "--output_dir").as_deref(), Some("/tmp/out"));
        // Configured defaults apply when the request is silent
        assert_eq!(value_after(&args, "--language").as_deref(), Some("zh"));
        assert_eq!(value_after(&args, "--initial_prompt").as_deref(), Some("glossary"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/in.wav"));
    }

    #[test]
    fn test_request_overrides_configured_language_and_prompt() {
        let config = SttConfig {
            fixed_language: Some("zh".to_string()),
            initial_prompt: Some("glossary".to_string()),
            ..SttConfig::default()
        };
        let engine = WhisperEngine::new(EngineKind::FasterWhisper, "whisper-ctranslate2", config);
        let args = arg_strings(&engine.build_args(
            Path::new("a.mp3"),
            Path::new("out"),
            Some("en"),
            Some("names"),
        ));
        assert_eq!(value_after(&args, "--language").as_deref(), Some("en"));
        assert_eq!(value_after(&args, "--initial_prompt").as_deref(), Some("names"));
    }

    #[test]
    fn test_openai_whisper_args_ignore_faster_settings() {
        let config = SttConfig {
            openai_model: "small".to_string(),
            fixed_language: Some("zh".to_string()),
            initial_prompt: Some("glossary".to_string()),
            ..SttConfig::default()
        };
        let engine = WhisperEngine::new(EngineKind::OpenAiWhisper, "whisper", config);
        let args = arg_strings(&engine.build_args(Path::new("a.wav"), Path::new("out"), None, None));

        assert_eq!(
            args,
            vec!["--model", "small", "--output_format", "json", "--output_dir", "out", "a.wav"]
        );
    }

    #[test]
    fn test_find_in_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_in_path("whisper", &path_var), None);

        let binary = dir.path().join("whisper");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Not executable yet
            assert_eq!(find_in_path("whisper", &path_var), None);
            std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        assert_eq!(find_in_path("whisper", &path_var), Some(binary));
    }

    #[test]
    fn test_detect_skips_non_executable_configured_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing-whisper");
        let config = SttConfig {
            faster_whisper_bin: Some(missing.clone()),
            ..SttConfig::default()
        };
        if let Some(engine) = WhisperEngine::detect(config) {
            assert_ne!(engine.binary(), missing.as_path());
        }
    }
}

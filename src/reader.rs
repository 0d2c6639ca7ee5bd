use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tracing::debug;

use crate::config::DEFAULT_MAX_INPUT_MB;

/// Configuration for input reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Largest accepted input in bytes
    pub max_bytes: usize,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_MB * 1024 * 1024,
            buffer_size: 8192,
        }
    }
}

/// Where an input came from, for error messages
fn describe(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    }
}

/// Size-limited async reader for text documents and audio payloads
#[derive(Debug, Clone, Default)]
pub struct InputReader {
    config: ReaderConfig,
}

impl InputReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read at most `max_bytes` from `source`, failing if more is available
    async fn read_limited<R>(&self, source: R, origin: &str) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let start_time = std::time::Instant::now();
        let limit = self.config.max_bytes;

        // WHY: reading one byte past the limit tells oversize input apart without buffering all of it
        let reader = BufReader::with_capacity(self.config.buffer_size, source);
        let mut bytes = Vec::new();
        reader
            .take(limit as u64 + 1)
            .read_to_end(&mut bytes)
            .await
            .with_context(|| format!("Failed to read input from {origin}"))?;

        if bytes.len() > limit {
            bail!(
                "Input from {origin} exceeds the {} MB limit",
                limit / (1024 * 1024)
            );
        }

        debug!(
            origin,
            bytes = bytes.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Read input"
        );
        Ok(bytes)
    }

    /// Read raw bytes from a file, or stdin when `path` is `None`
    pub async fn read_bytes(&self, path: Option<&Path>) -> Result<Vec<u8>> {
        let origin = describe(path);
        match path {
            Some(path) => {
                let file = File::open(path)
                    .await
                    .with_context(|| format!("Failed to open input file {}", path.display()))?;
                self.read_limited(file, &origin).await
            }
            None => self.read_limited(tokio::io::stdin(), &origin).await,
        }
    }

    /// Read a UTF-8 document from a file, or stdin when `path` is `None`
    pub async fn read_text(&self, path: Option<&Path>) -> Result<String> {
        let bytes = self.read_bytes(path).await?;
        String::from_utf8(bytes)
            .with_context(|| format!("Input from {} is not valid UTF-8", describe(path)))
    }
}

// Extractive summarization: positional lead baseline and frequency-ranked selection

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::language::classify;
use crate::scoring::{FrequencyScorer, ScoredSentence};
use crate::sentence_splitter::SentenceSplitter;

/// Default number of sentences in a summary
pub const DEFAULT_MAX_SENTENCES: usize = 3;
/// Upper bound accepted by callers for `max_sentences`
pub const MAX_SENTENCES_LIMIT: usize = 20;

/// Sentence selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// First sentences by position, no scoring
    Lead,
    /// Highest normalized term-frequency scores, document order restored
    #[default]
    Frequency,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Lead => "lead",
            Strategy::Frequency => "frequency",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lead" => Ok(Strategy::Lead),
            "frequency" => Ok(Strategy::Frequency),
            other => bail!("Unknown summary strategy '{other}' (expected lead or frequency)"),
        }
    }
}

/// Check a caller-supplied sentence budget against the accepted range
pub fn validate_max_sentences(max_sentences: usize) -> anyhow::Result<usize> {
    if !(1..=MAX_SENTENCES_LIMIT).contains(&max_sentences) {
        bail!("max_sentences must be between 1 and {MAX_SENTENCES_LIMIT}, got {max_sentences}");
    }
    Ok(max_sentences)
}

/// Pick the indices of the `k` best-scoring sentences, returned in document order
///
/// Ranking is a stable sort on descending score, so equal scores keep their
/// original relative order and the lower index wins a tie.
pub fn select_top(scored: &[ScoredSentence<'_>], k: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = scored.iter().map(|s| (s.index, s.score)).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(k);

    let mut selected: Vec<usize> = ranked.into_iter().map(|(index, _)| index).collect();
    selected.sort();
    selected
}

/// Extractive summarizer over the default splitter and scorer
#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    splitter: SentenceSplitter,
    scorer: FrequencyScorer,
}

impl Summarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarize `text` into at most `max_sentences` sentences
    ///
    /// A budget of 0 is treated as 1. An empty document yields no sentences.
    pub fn summarize(&self, text: &str, max_sentences: usize, strategy: Strategy) -> Vec<String> {
        let k = max_sentences.max(1);
        let sentences: Vec<&str> = self
            .splitter
            .split_borrowed(text)
            .into_iter()
            .map(|sentence| sentence.as_str())
            .collect();

        if sentences.is_empty() {
            return Vec::new();
        }

        let selected: Vec<&str> = match strategy {
            Strategy::Lead => sentences.iter().take(k).copied().collect(),
            Strategy::Frequency => {
                let lang = classify(text);
                let scored = self.scorer.score(&sentences, lang);
                select_top(&scored, k)
                    .into_iter()
                    .map(|index| sentences[index])
                    .collect()
            }
        };

        debug!(
            strategy = %strategy,
            total_sentences = sentences.len(),
            selected = selected.len(),
            "Summarized document"
        );

        selected.into_iter().map(str::to_string).collect()
    }
}

/// Summarize with default splitter and scorer
pub fn summarize(text: &str, max_sentences: usize, strategy: Strategy) -> Vec<String> {
    Summarizer::new().summarize(text, max_sentences, strategy)
}

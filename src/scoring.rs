// Document-wide term frequency and per-sentence normalized scores

use std::collections::HashMap;

use tracing::debug;

use crate::language::Language;
use crate::tokenizer::Tokenizer;

/// Token occurrence counts over a whole document, read-only once built
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
    max_count: usize,
    total_tokens: usize,
}

impl FrequencyTable {
    /// Count every token across all sentence token lists
    pub fn from_token_lists<S: AsRef<str>>(token_lists: &[Vec<S>]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total_tokens = 0;

        for tokens in token_lists {
            for token in tokens {
                *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
                total_tokens += 1;
            }
        }

        let max_count = counts.values().copied().max().unwrap_or(0);

        Self {
            counts,
            max_count,
            total_tokens,
        }
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Highest count of any single token, 0 for an empty table
    pub fn max_frequency(&self) -> usize {
        self.max_count
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    pub fn distinct_tokens(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_tokens == 0
    }

    /// Count of `token` relative to the most frequent token
    pub fn normalized(&self, token: &str) -> f64 {
        if self.max_count == 0 {
            return 0.0;
        }
        self.count(token) as f64 / self.max_count as f64
    }
}

/// A sentence with its origin index and frequency score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence<'a> {
    pub index: usize,
    pub text: &'a str,
    pub score: f64,
}

/// Scores sentences by the summed normalized frequency of their tokens
#[derive(Debug, Clone, Default)]
pub struct FrequencyScorer {
    tokenizer: Tokenizer,
}

impl FrequencyScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score each sentence; one result per input, in input order
    pub fn score<'a, S: AsRef<str>>(&self, sentences: &'a [S], lang: Language) -> Vec<ScoredSentence<'a>> {
        let token_lists: Vec<Vec<String>> = sentences
            .iter()
            .map(|sentence| self.tokenizer.tokenize(sentence.as_ref(), lang))
            .collect();
        let table = FrequencyTable::from_token_lists(&token_lists);

        debug!(
            sentences = sentences.len(),
            total_tokens = table.total_tokens(),
            distinct_tokens = table.distinct_tokens(),
            max_frequency = table.max_frequency(),
            "Built frequency table"
        );

        sentences
            .iter()
            .zip(&token_lists)
            .enumerate()
            .map(|(index, (sentence, tokens))| {
                // WHY: an all-stopword document has no max frequency; every sentence scores 0.0
                let score = if table.is_empty() {
                    0.0
                } else {
                    tokens.iter().fold(0.0, |acc, token| acc + table.normalized(token))
                };
                ScoredSentence {
                    index,
                    text: sentence.as_ref(),
                    score,
                }
            })
            .collect()
    }
}

/// Score sentences as `(index, score)` pairs in input order
pub fn score_sentences<S: AsRef<str>>(sentences: &[S], lang: Language) -> Vec<(usize, f64)> {
    FrequencyScorer::new()
        .score(sentences, lang)
        .into_iter()
        .map(|scored| (scored.index, scored.score))
        .collect()
}

// Punctuation-driven sentence extraction for mixed CJK/Latin text
// Spans close on a terminator or a newline; no inter-sentence whitespace is required

pub mod normalization;

pub use normalization::normalize_whitespace;

/// Sentence terminators shared by Chinese and Latin punctuation
pub const DEFAULT_TERMINATORS: &[char] = &['。', '！', '？', '.', '!', '?'];

/// Configuration for sentence splitting rules
#[derive(Debug, Clone)]
pub struct SplitRules {
    /// Characters that close a sentence and stay attached to it
    pub terminators: Vec<char>,
    /// Characters that close a sentence and are dropped
    pub hard_breaks: Vec<char>,
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            terminators: DEFAULT_TERMINATORS.to_vec(),
            hard_breaks: vec!['\n'],
        }
    }
}

/// A sentence borrowed from the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// 0-based position in the sentence sequence
    pub index: usize,
    /// Trimmed content, a substring of the source text
    pub content: &'a str,
}

impl<'a> Sentence<'a> {
    pub fn as_str(&self) -> &'a str {
        self.content
    }
}

/// Stateless sentence splitter; one instance can serve any number of threads
#[derive(Debug, Clone, Default)]
pub struct SentenceSplitter {
    rules: SplitRules,
}

impl SentenceSplitter {
    pub fn new(rules: SplitRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::default()
    }

    fn is_terminator(&self, ch: char) -> bool {
        self.rules.terminators.contains(&ch)
    }

    fn is_hard_break(&self, ch: char) -> bool {
        self.rules.hard_breaks.contains(&ch)
    }

    /// Split text into borrowed sentences in document order
    ///
    /// A span is a run of at least one non-terminator, non-break character,
    /// optionally closed by a single terminator. Terminators that do not follow
    /// such a run (the tail of `"..."`, a leading `"?"`) never form a sentence.
    /// The document is trimmed first, so leading whitespace does not open a span.
    pub fn split_borrowed<'a>(&self, text: &'a str) -> Vec<Sentence<'a>> {
        let text = text.trim();
        let mut sentences = Vec::new();
        let mut span_start: Option<usize> = None;

        for (pos, ch) in text.char_indices() {
            if self.is_hard_break(ch) {
                if let Some(start) = span_start.take() {
                    push_trimmed(&mut sentences, &text[start..pos]);
                }
            } else if self.is_terminator(ch) {
                if let Some(start) = span_start.take() {
                    push_trimmed(&mut sentences, &text[start..pos + ch.len_utf8()]);
                }
            } else if span_start.is_none() {
                span_start = Some(pos);
            }
        }

        if let Some(start) = span_start {
            push_trimmed(&mut sentences, &text[start..]);
        }

        sentences
    }

    /// Split text into owned sentence strings
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_borrowed(text)
            .into_iter()
            .map(|sentence| sentence.content.to_string())
            .collect()
    }
}

fn push_trimmed<'a>(sentences: &mut Vec<Sentence<'a>>, span: &'a str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        sentences.push(Sentence {
            index: sentences.len(),
            content: trimmed,
        });
    }
}

/// Split text with the default terminator set
pub fn split_sentences(text: &str) -> Vec<String> {
    SentenceSplitter::with_default_rules().split(text)
}

// Lowercased word and single-ideograph tokens with stopwords removed

pub mod stopwords;

pub use stopwords::StopwordChecker;

use crate::language::{is_cjk, Language};

/// Word characters: letters, digits and underscore, excluding CJK ideographs
/// which always stand alone as tokens
fn is_word_char(ch: char) -> bool {
    (ch.is_alphanumeric() || ch == '_') && !is_cjk(ch)
}

/// Tokenizer holding the stopword tables for both language classes
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordChecker,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract tokens in order, duplicates retained
    pub fn tokenize(&self, text: &str, lang: Language) -> Vec<String> {
        raw_tokens(&text.to_lowercase())
            .filter(|token| !self.stopwords.is_stopword(token, lang))
            .map(str::to_string)
            .collect()
    }
}

/// Scan already-lowercased text into maximal word runs and single ideographs
fn raw_tokens(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut chars = text.char_indices().peekable();

    std::iter::from_fn(move || {
        while let Some((start, ch)) = chars.next() {
            if is_cjk(ch) {
                return Some(&text[start..start + ch.len_utf8()]);
            }
            if is_word_char(ch) {
                let mut end = start + ch.len_utf8();
                while let Some(&(pos, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    end = pos + next.len_utf8();
                    chars.next();
                }
                return Some(&text[start..end]);
            }
        }
        None
    })
}

/// Tokenize with the default stopword tables
pub fn tokenize(text: &str, lang: Language) -> Vec<String> {
    Tokenizer::new().tokenize(text, lang)
}

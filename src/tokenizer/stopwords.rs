// Closed-class function words excluded from frequency scoring

use std::collections::HashSet;

use crate::language::Language;

/// English articles, conjunctions, prepositions, auxiliaries and pronouns
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "in", "on", "at", "to", "of", "for", "with",
    "is", "are", "was", "were", "be", "been", "being", "as", "by", "it", "this", "that",
    "these", "those", "from", "we", "you", "they", "i", "he", "she", "them", "his", "her",
    "their",
];

/// Chinese particles and high-frequency function words
pub const CHINESE_STOPWORDS: &[&str] = &[
    "的", "了", "和", "是", "在", "我", "有", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去",
];

/// Stopword lookup for both language classes
#[derive(Debug, Clone)]
pub struct StopwordChecker {
    english: HashSet<&'static str>,
    chinese: HashSet<&'static str>,
}

impl StopwordChecker {
    pub fn new() -> Self {
        Self {
            english: ENGLISH_STOPWORDS.iter().copied().collect(),
            chinese: CHINESE_STOPWORDS.iter().copied().collect(),
        }
    }

    /// Check a lowercased token against the list for `lang`
    pub fn is_stopword(&self, token: &str, lang: Language) -> bool {
        match lang {
            Language::En => self.english.contains(token),
            Language::Zh => self.chinese.contains(token),
        }
    }
}

impl Default for StopwordChecker {
    fn default() -> Self {
        Self::new()
    }
}

// Two-class language detection driving stopword and filler selection

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First code point of the CJK Unified Ideographs block
pub const CJK_START: char = '\u{4E00}';
/// Last code point of the CJK Unified Ideographs block
pub const CJK_END: char = '\u{9FFF}';

/// Language class of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// CJK-dominant text
    Zh,
    /// Latin-script text (the fallback)
    #[default]
    En,
}

impl Language {
    /// Short code used in responses and correction tables
    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Map a free-form language code onto a supported class
    ///
    /// Returns `None` for codes outside the two classes (e.g. `ja` reported
    /// by a speech engine), which callers treat as "not English".
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        match code.as_str() {
            "en" | "english" => Some(Language::En),
            "zh" | "chinese" => Some(Language::Zh),
            _ if code.starts_with("en-") || code.starts_with("en_") => Some(Language::En),
            _ if code.starts_with("zh-") || code.starts_with("zh_") => Some(Language::Zh),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| anyhow!("Unsupported language code: {s}"))
    }
}

/// Check whether a character is a CJK unified ideograph
pub fn is_cjk(ch: char) -> bool {
    (CJK_START..=CJK_END).contains(&ch)
}

/// Classify text as Chinese if it contains any CJK ideograph, English otherwise
pub fn classify(text: &str) -> Language {
    if text.chars().any(is_cjk) {
        Language::Zh
    } else {
        Language::En
    }
}

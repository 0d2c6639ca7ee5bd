// Style transformations over raw text: bullet lists, formal phrasing, filler removal

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::language::{classify, Language};
use crate::sentence_splitter::{normalize_whitespace, SentenceSplitter};

/// Filler words dropped by the concise style in English text
pub const FILLER_WORDS: &[&str] = &[
    "basically", "actually", "just", "really", "very", "kind", "sort", "literally",
];

/// Informal to formal phrase substitutions, applied in order
pub const FORMAL_REPLACEMENTS: &[(&str, &str)] = &[
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("gotta", "have to"),
    ("ok", "okay"),
];

/// Output style for [`optimize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Concise,
    Formal,
    Bullet,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Concise => "concise",
            Style::Formal => "formal",
            Style::Bullet => "bullet",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(Style::Concise),
            "formal" => Ok(Style::Formal),
            "bullet" => Ok(Style::Bullet),
            other => bail!("Unknown optimize style '{other}' (expected concise, formal or bullet)"),
        }
    }
}

/// First character uppercased, the rest lowercased
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Render each sentence as a `- ` list item, one per line
fn to_bullets(splitter: &SentenceSplitter, text: &str) -> String {
    splitter
        .split_borrowed(text)
        .iter()
        .map(|sentence| format!("- {}", sentence.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Case-paired plain substring replacement; not word-boundary aware, so
/// `token` becomes `tokayen`
fn to_formal(text: &str) -> String {
    let mut out = text.to_string();
    for (informal, formal) in FORMAL_REPLACEMENTS {
        out = out.replace(informal, formal);
        out = out.replace(&capitalize(informal), &capitalize(formal));
    }
    out
}

fn remove_fillers(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve whether filler removal applies: an explicit code wins, otherwise
/// the text is classified
fn is_english(text: &str, language: Option<&str>) -> bool {
    match language.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => Language::from_code(code) == Some(Language::En),
        None => classify(text) == Language::En,
    }
}

/// Transform `text` into `style`
///
/// Text with no sentences yields an empty string for every style.
pub fn optimize(text: &str, style: Style, language: Option<&str>) -> String {
    let splitter = SentenceSplitter::with_default_rules();
    if splitter.split_borrowed(text).is_empty() {
        return String::new();
    }

    match style {
        Style::Bullet => to_bullets(&splitter, text),
        Style::Formal => to_formal(text),
        Style::Concise => {
            if is_english(text, language) {
                remove_fillers(text)
            } else {
                normalize_whitespace(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_cjk() {
        let result = optimize("第一句。第二句！第三句？", Style::Bullet, None);
        assert_eq!(result, "- 第一句。\n- 第二句！\n- 第三句？");
    }

    #[test]
    fn test_bullet_reapplied_is_not_idempotent() {
        let once = optimize("One. Two.", Style::Bullet, None);
        assert_eq!(once, "- One.\n- Two.");
        let twice = optimize(&once, Style::Bullet, None);
        assert_eq!(twice, "- - One.\n- - Two.");
    }

    #[test]
    fn test_formal_case_paired() {
        let result = optimize("I'm gonna go. It's ok.", Style::Formal, None);
        assert_eq!(result, "I'm going to go. It's okay.");

        let result = optimize("Gonna do it. Wanna come? Gotta run. Ok.", Style::Formal, None);
        assert_eq!(result, "Going to do it. Want to come? Have to run. Okay.");
    }

    #[test]
    fn test_formal_is_substring_based() {
        assert_eq!(optimize("Pass the token.", Style::Formal, None), "Pass the tokayen.");
        // Only lowercase and capitalized forms are paired
        assert_eq!(optimize("OK then.", Style::Formal, None), "OK then.");
    }

    #[test]
    fn test_concise_removes_fillers() {
        let result = optimize("It is actually really very good.", Style::Concise, None);
        assert_eq!(result, "It is good.");
        let lower = result.to_lowercase();
        assert!(!lower.contains("actually") && !lower.contains("really") && !lower.contains("very"));
    }

    #[test]
    fn test_concise_filler_match_is_whole_token() {
        // Punctuation stays attached, so "very," is not a filler token
        let result = optimize("Basically   it was very, VERY\tloud.", Style::Concise, None);
        assert_eq!(result, "it was very, loud.");
    }

    #[test]
    fn test_concise_non_english_only_normalizes() {
        let result = optimize("  这个 真的   很好。 ", Style::Concise, None);
        assert_eq!(result, "这个 真的 很好。");

        // Explicit non-English code disables filler removal
        let result = optimize("It is really   good.", Style::Concise, Some("ja"));
        assert_eq!(result, "It is really good.");
    }

    #[test]
    fn test_concise_explicit_english_overrides_detection() {
        let result = optimize("中文 really 好。", Style::Concise, Some("en"));
        assert_eq!(result, "中文 好。");
    }

    #[test]
    fn test_empty_input_all_styles() {
        for style in [Style::Concise, Style::Formal, Style::Bullet] {
            assert_eq!(optimize("", style, None), "");
            assert_eq!(optimize("  \n ", style, None), "");
        }
    }

    #[test]
    fn test_leading_whitespace_before_terminator_is_empty() {
        for style in [Style::Concise, Style::Formal, Style::Bullet] {
            assert_eq!(optimize("  ?", style, None), "");
        }
        assert_eq!(optimize(" .rustcat", Style::Bullet, None), "- rustcat");
    }

    #[test]
    fn test_capitalize_lowercases_tail() {
        assert_eq!(capitalize("going to"), "Going to");
        assert_eq!(capitalize("oK"), "Ok");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("bullet".parse::<Style>().unwrap(), Style::Bullet);
        assert_eq!(" Formal ".parse::<Style>().unwrap(), Style::Formal);
        assert!("poetic".parse::<Style>().is_err());
        assert_eq!(Style::default(), Style::Concise);
    }
}

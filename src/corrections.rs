// Optional per-language term corrections applied to speech transcripts

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::warn;

/// Ordered list of `(from, to)` substitutions
pub type CorrectionMap = Vec<(String, String)>;

/// Correction tables loaded once at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionConfig {
    /// Master switch; when off, text passes through unchanged
    pub enabled: bool,
    /// Substitutions for Chinese transcripts
    pub zh: CorrectionMap,
    /// Whole-word substitutions for English transcripts
    pub en: CorrectionMap,
}

impl CorrectionConfig {
    /// Build a language map from its JSON form, falling back to the pair list
    ///
    /// JSON wins when present and well-formed; a malformed JSON value logs a
    /// warning and the pair list is used instead.
    pub fn load_map(json: Option<&str>, pairs: Option<&str>) -> CorrectionMap {
        if let Some(json) = json.filter(|s| !s.is_empty()) {
            match parse_json_map(json) {
                Ok(map) => return map,
                Err(e) => warn!("Ignoring malformed correction map JSON: {e}"),
            }
        }
        pairs
            .filter(|s| !s.is_empty())
            .map(parse_pairs)
            .unwrap_or_default()
    }
}

fn insert_or_replace(map: &mut CorrectionMap, key: String, value: String) {
    match map.iter_mut().find(|(existing, _)| *existing == key) {
        Some(entry) => entry.1 = value,
        None => map.push((key, value)),
    }
}

/// Parse a JSON object of `"from": "to"` entries, keeping document order
///
/// Non-string values are rendered with their JSON text.
pub fn parse_json_map(json: &str) -> Result<CorrectionMap> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(object) = value else {
        bail!("correction map must be a JSON object");
    };

    let mut map = CorrectionMap::new();
    for (key, value) in object {
        let value = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        insert_or_replace(&mut map, key, value);
    }
    Ok(map)
}

/// Parse `from->to,foo=>bar` pair lists; entries without an arrow or with an
/// empty key are skipped
pub fn parse_pairs(pairs: &str) -> CorrectionMap {
    let mut map = CorrectionMap::new();
    for raw in pairs.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Some((key, value)) = raw.split_once("=>").or_else(|| raw.split_once("->")) else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if !key.is_empty() {
            insert_or_replace(&mut map, key.to_string(), value.to_string());
        }
    }
    map
}

/// Word characters for boundary checks: letters, digits, underscore
fn is_word_char(ch: Option<char>) -> bool {
    ch.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// True when a word boundary sits at byte offset `pos`
fn is_boundary(text: &str, pos: usize) -> bool {
    let before = text[..pos].chars().next_back();
    let after = text[pos..].chars().next();
    is_word_char(before) != is_word_char(after)
}

/// Replace occurrences of `needle` bounded by word boundaries on both sides
pub fn replace_whole_words(text: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        if rest.starts_with(needle) && is_boundary(text, pos) && is_boundary(text, pos + needle.len()) {
            out.push_str(&text[copied_to..pos]);
            out.push_str(replacement);
            pos += needle.len();
            copied_to = pos;
            continue;
        }
        // Advance one character, staying on a char boundary
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&text[copied_to..]);
    out
}

/// Applies the configured corrections to transcripts
#[derive(Debug, Clone, Default)]
pub struct Corrector {
    config: CorrectionConfig,
}

impl Corrector {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn map_for(&self, lang: &str) -> &[(String, String)] {
        match lang {
            "zh" => &self.config.zh,
            "en" => &self.config.en,
            _ => &[],
        }
    }

    /// Apply corrections for `lang`
    ///
    /// English entries only match whole words; every other language uses plain
    /// substring replacement.
    pub fn apply(&self, text: &str, lang: &str) -> String {
        if !self.is_enabled() || text.is_empty() {
            return text.to_string();
        }
        let lang = if lang.is_empty() { "en" } else { lang };
        let map = self.map_for(lang);

        let mut out = text.to_string();
        for (from, to) in map {
            out = if lang == "en" {
                replace_whole_words(&out, from, to)
            } else {
                out.replace(from.as_str(), to)
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> CorrectionMap {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_pairs_both_arrows() {
        let map = parse_pairs("错->对, foo => bar ,,nonsense, ->empty,a=>b->c");
        assert_eq!(map, pairs(&[("错", "对"), ("foo", "bar"), ("a", "b->c")]));
    }

    #[test]
    fn test_parse_pairs_duplicate_key_keeps_position() {
        let map = parse_pairs("a->1,b->2,a->3");
        assert_eq!(map, pairs(&[("a", "3"), ("b", "2")]));
    }

    #[test]
    fn test_parse_json_map_order_and_values() {
        let map = parse_json_map(r#"{"zeta": "z", "alpha": "a", "num": 5}"#).unwrap();
        assert_eq!(map, pairs(&[("zeta", "z"), ("alpha", "a"), ("num", "5")]));

        assert!(parse_json_map("[1, 2]").is_err());
        assert!(parse_json_map("{not json").is_err());
    }

    #[test]
    fn test_load_map_precedence() {
        let map = CorrectionConfig::load_map(Some(r#"{"k": "json"}"#), Some("k->pairs"));
        assert_eq!(map, pairs(&[("k", "json")]));

        let map = CorrectionConfig::load_map(Some("{broken"), Some("k->pairs"));
        assert_eq!(map, pairs(&[("k", "pairs")]));

        let map = CorrectionConfig::load_map(Some(""), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_replace_whole_words() {
        assert_eq!(replace_whole_words("git hub github hub", "hub", "HUB"), "git HUB github HUB");
        assert_eq!(replace_whole_words("hub_x hub.", "hub", "H"), "hub_x H.");
        assert_eq!(replace_whole_words("naïve hub", "hub", "H"), "naïve H");
        assert_eq!(replace_whole_words("", "hub", "H"), "");
        assert_eq!(replace_whole_words("abc", "", "H"), "abc");
    }

    #[test]
    fn test_replace_whole_words_retries_after_failed_candidate() {
        // The first candidate at offset 0 fails the trailing boundary
        assert_eq!(replace_whole_words("aaa aa", "aa", "X"), "aaa X");
    }

    #[test]
    fn test_apply_english_whole_words() {
        let corrector = Corrector::new(CorrectionConfig {
            enabled: true,
            zh: Vec::new(),
            en: pairs(&[("rust lang", "Rust"), ("kube", "Kubernetes")]),
        });
        let out = corrector.apply("I use rust lang on kube, not kubectl.", "en");
        assert_eq!(out, "I use Rust on Kubernetes, not kubectl.");
    }

    #[test]
    fn test_apply_chinese_substring() {
        let corrector = Corrector::new(CorrectionConfig {
            enabled: true,
            zh: pairs(&[("锈语言", "Rust")]),
            en: Vec::new(),
        });
        assert_eq!(corrector.apply("我喜欢锈语言编程", "zh"), "我喜欢Rust编程");
    }

    #[test]
    fn test_apply_disabled_or_unknown_language() {
        let config = CorrectionConfig {
            enabled: false,
            zh: Vec::new(),
            en: pairs(&[("foo", "bar")]),
        };
        let disabled = Corrector::new(config.clone());
        assert!(!disabled.is_enabled());
        assert_eq!(disabled.apply("foo", "en"), "foo");

        let corrector = Corrector::new(CorrectionConfig { enabled: true, ..config });
        assert!(corrector.is_enabled());
        assert!(!Corrector::default().is_enabled());
        assert_eq!(corrector.apply("foo", "ja"), "foo");
        // Missing language falls back to English
        assert_eq!(corrector.apply("foo", ""), "bar");
    }
}

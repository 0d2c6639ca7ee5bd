// Test fixtures with known documents and expected summaries

/// Short English article with one dominant topic
pub const ENGLISH_ARTICLE: &str = "Rust is a systems programming language. \
It was first released in 2015. \
Rust guarantees memory safety without a garbage collector. \
The weather today is pleasant. \
Many companies now adopt Rust for safety critical Rust services.";

/// Expected frequency summary of ENGLISH_ARTICLE with two sentences
pub const ENGLISH_TOP_TWO: &[&str] = &[
    "Rust guarantees memory safety without a garbage collector.",
    "Many companies now adopt Rust for safety critical Rust services.",
];

/// Dense Chinese text without spaces
pub const CHINESE_ARTICLE: &str = "今天我们讨论编程。编程需要耐心和练习！天气不错？";

/// Mixed punctuation and line breaks
pub const MIXED_TEXT: &str = "First line without a stop\nSecond line. Third!\n\n第四句。";

/// Sentences of MIXED_TEXT in order
pub const MIXED_SENTENCES: &[&str] = &[
    "First line without a stop",
    "Second line.",
    "Third!",
    "第四句。",
];

/// Transcript body emitted by the fake engine
pub const FAKE_TRANSCRIPT_JSON: &str =
    r#"{"text": "  We ship kube clusters. Kube needs care. Lunch was fine.  ", "language": "en"}"#;

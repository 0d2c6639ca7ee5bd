// Whitespace normalization shared by the splitter and the optimizer's final pass

/// Collapse every run of whitespace into a single space and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_whitespace_into(text, &mut result);
    result
}

/// Normalize into a supplied buffer, clearing it first
pub fn normalize_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    for word in text.split_whitespace() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}

//! Text sanitization for prompt inclusion and suggestion cleanup.

/// Sanitize diff text for inclusion in an LLM prompt.
///
/// Applies control-char removal (newlines and tabs survive), ANSI escape
/// removal, and truncation to `max_len` on a char boundary.
pub fn sanitize_diff(text: &str, max_len: usize) -> String {
    let mut result = remove_ansi_escapes(text);
    result = remove_control_chars(&result);

    if result.len() > max_len {
        let mut end = max_len;
        while end > 0 && !result.is_char_boundary(end) {
            end -= 1;
        }
        result.truncate(end);
    }

    result
}

/// Remove control characters except newlines and tabs.
fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Remove ANSI escape sequences (CSI `ESC [ ... final-byte`).
fn remove_ansi_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Skip parameter and intermediate bytes up to the final byte
            for seq_char in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&seq_char) {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Normalize a raw LLM suggestion into a single usable line.
///
/// Drops backticks and code fences, trims whitespace, and keeps only the
/// first non-empty line. Returns None when nothing survives.
pub fn clean_suggestion(raw: &str) -> Option<String> {
    let cleaned = raw.replace('`', "");

    let line = cleaned
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && *l != "json")?;

    Some(line.to_string())
}

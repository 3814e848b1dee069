//! Greedy word wrapping.

/// Column width used when a completion is reflowed.
pub const DEFAULT_WRAP_WIDTH: usize = 50;

/// Reflows `text` into lines of at most `width` characters.
///
/// Runs of whitespace, newlines included, collapse to a single space and
/// lines break only between words. A word longer than `width` is kept whole
/// on its own line.
pub fn fill(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

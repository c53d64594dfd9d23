pub(crate) fn split_lines_preserve_trailing(text: &str) -> Vec<String> {
    // `str::split('\n')` preserves trailing empty segments, which matches typical editor
    // line semantics (N newlines => N+1 lines), and keeps behavior consistent with Rope.
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Byte offset of character `column` in `line`, clamped to the line end.
fn char_to_byte(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(line.len())
}

/// Half-open character slice `[start, end)` of `line`; out-of-range columns clamp.
pub(crate) fn char_slice(line: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(line, start);
    let end_byte = char_to_byte(line, end).max(start_byte);
    &line[start_byte..end_byte]
}

/// Suffix of `line` starting at character `start`.
pub(crate) fn char_suffix(line: &str, start: usize) -> &str {
    &line[char_to_byte(line, start)..]
}

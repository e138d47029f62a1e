/// Default line length for the summary panel's description column
pub const DEFAULT_MAX_LINE_LEN: usize = 54;

/// Default number of lines before remaining text is discarded
pub const DEFAULT_MAX_LINES: usize = 4;

/// Wrap free text into at most `max_lines` lines of at most `max_len` chars.
///
/// `\n` and `\r\n` terminate the current line; a line that reaches `max_len`
/// is forcibly terminated. Once the line budget is spent the rest of the
/// input is discarded. A non-empty trailing partial line is emitted only if
/// the budget allows it.
pub fn wrap_text(text: &str, max_len: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut chars = text.chars().peekable();

    while lines.len() < max_lines {
        let Some(c) = chars.next() else { break };

        if c == '\n' {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        } else if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        } else {
            current.push(c);
            current_len += 1;

            if current_len >= max_len {
                lines.push(std::mem::take(&mut current));
                current_len = 0;

                if lines.len() >= max_lines {
                    break;
                }
            }
        }
    }

    if !current.is_empty() && lines.len() < max_lines {
        lines.push(current);
    }

    lines
}

/// Wrap with the summary panel defaults
pub fn wrap_description(text: &str) -> Vec<String> {
    wrap_text(text, DEFAULT_MAX_LINE_LEN, DEFAULT_MAX_LINES)
}

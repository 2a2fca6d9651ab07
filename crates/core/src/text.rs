//! Bracket- and quote-aware string helpers shared by the parsers

/// Byte offsets of every `delimiter` that sits outside brackets and string
/// literals. `(`, `[`, `{` and `<` open a level; `->` is not a closer.
fn top_level_positions(text: &str, delimiter: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut previous = '\0';

    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            previous = ch;
            continue;
        }

        if ch == delimiter && depth == 0 {
            positions.push(index);
        } else {
            match ch {
                '"' => in_string = true,
                '(' | '[' | '{' | '<' => depth += 1,
                '>' if previous == '-' => {}
                ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        previous = ch;
    }
    positions
}

/// Split on every top-level `delimiter`
pub fn split_top_level(text: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for position in top_level_positions(text, delimiter) {
        parts.push(&text[start..position]);
        start = position + delimiter.len_utf8();
    }
    parts.push(&text[start..]);
    parts
}

/// Split once on the first top-level `delimiter`
pub fn split_first_top_level(text: &str, delimiter: char) -> Option<(&str, &str)> {
    let position = *top_level_positions(text, delimiter).first()?;
    Some((&text[..position], &text[position + delimiter.len_utf8()..]))
}

/// Top-level comma separated items, trimmed
pub fn comma_separated(text: &str) -> Vec<&str> {
    split_top_level(text, ',').into_iter().map(str::trim).collect()
}

/// Strip one leading and one trailing character
pub fn drop_first_and_last(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Whether the opening bracket at the start of `text` is closed by its last
/// character
pub fn is_wrapped_by(text: &str, open: char, close: char) -> bool {
    if !text.starts_with(open) || !text.ends_with(close) || text.len() < 2 {
        return false;
    }
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;
    let last = text.len() - close.len_utf8();
    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return index == last;
            }
        }
    }
    false
}

/// A parenthesized list with at least one top-level comma
pub fn is_tuple_literal(text: &str) -> bool {
    is_wrapped_by(text, '(', ')') && split_top_level(drop_first_and_last(text), ',').len() > 1
}

/// Normalize parentheses in a type name.
///
/// Redundant parentheses around a single element are removed and missing
/// opening parentheses are restored, so that a type run cut out of token
/// stream (`Int, String) -> Void`) reads as a whole type again.
pub fn brackets_balancing(text: &str) -> String {
    let text = text.trim();
    if is_wrapped_by(text, '(', ')') {
        let inner = drop_first_and_last(text).trim();
        if !inner.is_empty() && split_top_level(inner, ',').len() == 1 {
            return brackets_balancing(inner);
        }
        return text.to_string();
    }

    let opened = text.matches('(').count();
    let closed = text.matches(')').count();
    if closed > opened {
        format!("{}{}", "(".repeat(closed - opened), text)
    } else if opened > closed {
        format!("{}{}", text, ")".repeat(opened - closed))
    } else {
        text.to_string()
    }
}

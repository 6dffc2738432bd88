/// Re-flows `text` to fit `max_columns`, prefixing continuation lines with
/// `indent` spaces. The width available for content is `max_columns -
/// indent`; only a single token longer than that budget may exceed it (it
/// is cut at the budget).
///
/// A line break already present in the window and followed by a space marks
/// preformatted text: the break is kept, the following line is re-indented
/// and its old leading spaces are dropped. Otherwise the break point is the
/// rightmost space or hyphen in the window, preferring the hyphen when it
/// is further right and not immediately followed by a digit (so numeric
/// ranges and version strings stay intact). Wrapping already-wrapped text
/// at the same width reproduces it.
#[must_use]
pub fn wrap(text: &str, indent: usize, max_columns: usize) -> String {
    let width = max_columns.saturating_sub(indent);
    if width == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(indent);
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + text.len() / width.max(1) * (indent + 1));
    let mut idx = 0;

    while text.len() - idx > width {
        let lookahead = floor_char_boundary(text, (idx + width + 1).min(text.len()));
        if let Some(lf) = text[idx..lookahead].rfind('\n') {
            if lf > 0 && bytes.get(idx + lf + 1) == Some(&b' ') {
                out.push_str(&text[idx..=idx + lf]);
                out.push_str(&pad);
                idx += lf + 1;
                while bytes.get(idx) == Some(&b' ') {
                    idx += 1;
                }
                continue;
            }
        }

        let mut end = floor_char_boundary(text, idx + width);
        if end <= idx {
            // single oversized character, step past it
            end = ceil_char_boundary(text, idx + 1);
        }
        let window = &text[idx..end];
        let space = window.rfind(' ');
        let hyphen = window
            .rfind('-')
            .filter(|&h| !bytes.get(idx + h + 1).is_some_and(u8::is_ascii_digit));

        match (space, hyphen) {
            (space, Some(h)) if space.is_none_or(|s| h > s) => {
                out.push_str(&window[..=h]);
                out.push('\n');
                out.push_str(&pad);
                idx += h + 1;
            }
            (Some(s), _) => {
                out.push_str(&window[..s]);
                out.push('\n');
                out.push_str(&pad);
                idx += s + 1;
            }
            (None, _) => {
                out.push_str(window);
                out.push('\n');
                out.push_str(&pad);
                idx = end;
            }
        }
    }
    out.push_str(&text[idx..]);
    out
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i.min(s.len())
}

//! Whitespace normalization.

/// Collapses every run of whitespace (spaces, tabs, newlines) to a single
/// space and trims both ends. Comments count as whitespace. Quoted text is
/// copied verbatim, so literals keep their exact content.
#[must_use]
pub fn normalize(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        let close = match c {
            '\'' | '"' | '`' => Some(c),
            '[' => Some(']'),
            _ => None,
        };

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c == '-' && chars.peek() == Some(&'-') {
            for next in chars.by_ref() {
                if next == '\n' {
                    break;
                }
            }
            pending_space = true;
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for next in chars.by_ref() {
                if prev == '*' && next == '/' {
                    break;
                }
                prev = next;
            }
            pending_space = true;
            continue;
        }

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);

        if let Some(close) = close {
            // Doubled closing quotes are escapes and simply toggle back in.
            for next in chars.by_ref() {
                out.push(next);
                if next == close {
                    break;
                }
            }
        }
    }

    out
}

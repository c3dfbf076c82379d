//! Where a multi-line capture ends.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Phone:", "Mailing Address:", "Major/Field of Study:" at the start of a line
    static ref LABEL_LINE: Regex = Regex::new(
        r"^\s*[A-Z][A-Za-z'/\-]*(?:[ \t]+[A-Za-z'/\-]+){0,4}[ \t]*:"
    ).unwrap();
}

/// Whether a line opens the next labeled field.
pub fn is_label_line(line: &str) -> bool {
    LABEL_LINE.is_match(line)
}

/// Extend a capture ending at `end` over the lines that follow it.
///
/// Continuation stops before a label line, a blank line (page markers trim
/// to blank) or the end of the text. A capture that does not end at a line
/// break is returned unchanged.
pub fn extend_capture(text: &str, end: usize) -> usize {
    let rest = &text[end..];
    let mut offset = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        return end;
    };

    let mut extended = end;

    while offset < rest.len() {
        let line_end = rest[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(rest.len());
        let line = &rest[offset..line_end];

        if line.trim().is_empty() || is_label_line(line) {
            break;
        }

        extended = end + line_end;
        offset = line_end + 1;
    }

    extended
}

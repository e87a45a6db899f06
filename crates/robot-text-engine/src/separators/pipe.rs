use super::is_blank;

/// A pipe line opens with `|` (optionally after one space) that is followed
/// by whitespace or the end of the line.
pub(super) fn starts_pipe_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    let pipe = match bytes {
        [b'|', ..] => 0,
        [b' ', b'|', ..] => 1,
        _ => return false,
    };
    is_separator_pipe(bytes, pipe)
}

/// `|` counts as a separator only with whitespace (or a line edge) on both
/// sides; `a|b` and `\|` stay inside their cell.
fn is_separator_pipe(bytes: &[u8], at: usize) -> bool {
    let before = at == 0 || is_blank(bytes[at - 1]);
    let after = at + 1 == bytes.len() || is_blank(bytes[at + 1]);
    bytes[at] == b'|' && before && after
}

pub(super) fn find(line: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = line.as_bytes();
    let pipe = (from..bytes.len()).find(|&at| is_separator_pipe(bytes, at))?;

    let start = if pipe > from && is_blank(bytes[pipe - 1]) {
        pipe - 1
    } else {
        pipe
    };

    let mut end = pipe + 1;
    while end < bytes.len() && is_blank(bytes[end]) {
        end += 1;
    }
    // The blank right before the next pipe is that pipe's own padding.
    if end < bytes.len() && end > pipe + 1 && is_separator_pipe(bytes, end) {
        end -= 1;
    }
    Some((start, end))
}

use regex::Regex;
use std::sync::OnceLock;

static SPACE_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn space_separator() -> &'static Regex {
    SPACE_SEPARATOR.get_or_init(|| Regex::new(r"[ \t]{2,}|\t").expect("Invalid separator regex"))
}

pub(super) fn find(line: &str, from: usize) -> Option<(usize, usize)> {
    space_separator()
        .find_at(line, from)
        .map(|m| (m.start(), m.end()))
}

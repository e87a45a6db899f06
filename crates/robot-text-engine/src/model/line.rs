use crate::separators::{Separator, SeparatorKind};
use crate::tokens::TokenId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineElement {
    Token(TokenId),
    Separator(Separator),
}

/// One physical source line: its tokens and separators in order, plus the
/// terminator it ended with (empty on an unterminated last line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotLine {
    pub number: usize,
    pub elements: Vec<LineElement>,
    pub eol: String,
}

impl RobotLine {
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.elements.iter().filter_map(|e| match e {
            LineElement::Token(id) => Some(*id),
            LineElement::Separator(_) => None,
        })
    }

    pub fn contains(&self, token: TokenId) -> bool {
        self.tokens().any(|id| id == token)
    }

    /// Kind of the first separator, `None` for a single-cell line.
    pub fn separator_kind(&self) -> Option<SeparatorKind> {
        self.elements.iter().find_map(|e| match e {
            LineElement::Separator(separator) => Some(separator.kind),
            LineElement::Token(_) => None,
        })
    }
}

/// Split `text` into lines, keeping each line's terminator.
pub fn split_lines(text: &str) -> Vec<(&str, &str)> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut at = 0;
    while at < bytes.len() {
        match bytes[at] {
            b'\n' => {
                lines.push((&text[start..at], &text[at..at + 1]));
                at += 1;
                start = at;
            }
            b'\r' => {
                let len = if bytes.get(at + 1) == Some(&b'\n') { 2 } else { 1 };
                lines.push((&text[start..at], &text[at..at + len]));
                at += len;
                start = at;
            }
            _ => at += 1,
        }
    }
    if start < bytes.len() {
        lines.push((&text[start..], ""));
    }
    lines
}

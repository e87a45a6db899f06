//! Column splitters.
//!
//! A physical line is cut into cells by one of three strategies:
//!
//! - [`SeparatorStrategy::Space`]: runs of two or more spaces, or any run
//!   containing a tab. A single space is part of the cell.
//! - [`SeparatorStrategy::Pipe`]: `|` delimited cells. Whitespace directly in
//!   front of the next pipe belongs to that pipe's separator, so cell padding
//!   survives a round trip exactly.
//! - [`SeparatorStrategy::Tab`]: every tab character.
//!
//! Plain text files pick between space and pipe per line; TSV files always
//! use tabs.
//!
//! [`escape_cell`] is the inverse direction: it makes edited text safe to
//! write back between separators of a given kind.

mod pipe;
mod space;
mod tab;

use crate::format::FileFormat;
use crate::tokens::FilePosition;
use serde::Serialize;
use std::borrow::Cow;

/// Written for a cell whose text is empty.
pub const EMPTY_CELL: &str = "${EMPTY}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeparatorKind {
    Pipe,
    Space,
    Tab,
}

/// Delimiter text between two cells, kept verbatim for dumping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Separator {
    pub kind: SeparatorKind,
    pub text: String,
    pub position: FilePosition,
}

impl Separator {
    pub fn start(&self) -> usize {
        self.position.column
    }

    pub fn end(&self) -> usize {
        self.position.column + self.text.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStrategy {
    Space,
    Pipe,
    Tab,
}

impl SeparatorStrategy {
    /// Strategy for one physical line of a file in `format`.
    pub fn for_line(format: FileFormat, line: &str) -> Self {
        match format {
            FileFormat::Tsv => SeparatorStrategy::Tab,
            FileFormat::Txt if pipe::starts_pipe_line(line) => SeparatorStrategy::Pipe,
            FileFormat::Txt => SeparatorStrategy::Space,
        }
    }

    pub fn kind(self) -> SeparatorKind {
        match self {
            SeparatorStrategy::Space => SeparatorKind::Space,
            SeparatorStrategy::Pipe => SeparatorKind::Pipe,
            SeparatorStrategy::Tab => SeparatorKind::Tab,
        }
    }

    /// Lazily walk the separators of `line`, which starts at `start` in the
    /// file.
    pub fn separators<'a>(self, line: &'a str, start: FilePosition) -> Separators<'a> {
        Separators {
            strategy: self,
            line,
            start,
            cursor: 0,
            peeked: None,
        }
    }

    fn find(self, line: &str, from: usize) -> Option<(usize, usize)> {
        match self {
            SeparatorStrategy::Space => space::find(line, from),
            SeparatorStrategy::Pipe => pipe::find(line, from),
            SeparatorStrategy::Tab => tab::find(line, from),
        }
    }
}

/// Separator sequence of a single line, with `has_next`/`next` access.
pub struct Separators<'a> {
    strategy: SeparatorStrategy,
    line: &'a str,
    start: FilePosition,
    cursor: usize,
    peeked: Option<Option<Separator>>,
}

impl Separators<'_> {
    pub fn has_next(&mut self) -> bool {
        if self.peeked.is_none() {
            let next = self.advance();
            self.peeked = Some(next);
        }
        matches!(self.peeked, Some(Some(_)))
    }

    fn advance(&mut self) -> Option<Separator> {
        let (start, end) = self.strategy.find(self.line, self.cursor)?;
        self.cursor = end;
        Some(Separator {
            kind: self.strategy.kind(),
            text: self.line[start..end].to_string(),
            position: self.start.advanced_by(start),
        })
    }
}

impl Iterator for Separators<'_> {
    type Item = Separator;

    fn next(&mut self) -> Option<Separator> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.advance(),
        }
    }
}

fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Escape `text` so that it reads back as exactly one cell between
/// separators of `kind`. Text that is already safe is borrowed unchanged,
/// so parsed cells (which keep their source escapes) never change.
pub fn escape_cell(text: &str, kind: SeparatorKind) -> Cow<'_, str> {
    if text.is_empty() {
        return Cow::Borrowed(EMPTY_CELL);
    }
    let needs_escape = match kind {
        SeparatorKind::Tab => text.contains('\t'),
        SeparatorKind::Pipe => (0..text.len()).any(|at| is_loose_pipe(text.as_bytes(), at)),
        SeparatorKind::Space => {
            text.contains('\t')
                || text.contains("  ")
                || text.starts_with(' ')
                || text.ends_with(' ')
        }
    };
    if !needs_escape {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 4);
    for (at, c) in text.char_indices() {
        match (kind, c) {
            (SeparatorKind::Tab | SeparatorKind::Space, '\t') => out.push_str("\\t"),
            (SeparatorKind::Pipe, '|') if is_loose_pipe(bytes, at) => out.push_str("\\|"),
            (SeparatorKind::Space, ' ')
                if at == 0 || at + 1 == bytes.len() || bytes[at - 1] == b' ' =>
            {
                out.push_str("\\ ")
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A `|` inside cell text that the pipe splitter would take for a
/// separator once the cell is padded with spaces.
fn is_loose_pipe(bytes: &[u8], at: usize) -> bool {
    bytes[at] == b'|'
        && (at == 0 || is_blank(bytes[at - 1]))
        && (at + 1 == bytes.len() || is_blank(bytes[at + 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn split(strategy: SeparatorStrategy, line: &str) -> Vec<(String, usize)> {
        strategy
            .separators(line, FilePosition::new(1, 0, 0))
            .map(|s| (s.text, s.position.column))
            .collect()
    }

    #[test]
    fn pipe_separators_leave_padding_for_the_next_pipe() {
        let mut separators =
            SeparatorStrategy::Pipe.separators("| | ...    foobar", FilePosition::new(3, 0, 40));
        assert!(separators.has_next());
        let first = separators.next().unwrap();
        assert_eq!(first.text, "|");
        assert_eq!(first.position, FilePosition::new(3, 0, 40));
        assert!(separators.has_next());
        let second = separators.next().unwrap();
        assert_eq!(second.text, " | ");
        assert_eq!(second.position.column, 1);
        assert!(!separators.has_next());
        assert_eq!(separators.next(), None);
    }

    #[test]
    fn pipe_cells_keep_padding_and_trailing_pipe() {
        assert_eq!(
            split(SeparatorStrategy::Pipe, "|  Log  |  x  |"),
            vec![
                ("|  ".to_string(), 0),
                (" |  ".to_string(), 7),
                (" |".to_string(), 13),
            ]
        );
    }

    #[rstest]
    #[case("a|b")]
    #[case("Log    a\\|b")]
    fn embedded_pipes_are_not_separators(#[case] line: &str) {
        assert!(split(SeparatorStrategy::Pipe, line).is_empty());
    }

    #[test]
    fn space_separators_need_two_spaces_or_a_tab() {
        assert_eq!(
            split(SeparatorStrategy::Space, "Open Browser    http://x  \tchrome\tx"),
            vec![
                ("    ".to_string(), 12),
                ("  \t".to_string(), 24),
                ("\t".to_string(), 33),
            ]
        );
        assert!(split(SeparatorStrategy::Space, "Suite Setup").is_empty());
    }

    #[test]
    fn tab_separators_are_single_tabs() {
        assert_eq!(
            split(SeparatorStrategy::Tab, "a\t\tb  c"),
            vec![("\t".to_string(), 1), ("\t".to_string(), 2)]
        );
    }

    #[rstest]
    #[case("Log", SeparatorKind::Space, "Log")]
    #[case("", SeparatorKind::Space, "${EMPTY}")]
    #[case("", SeparatorKind::Pipe, "${EMPTY}")]
    #[case("", SeparatorKind::Tab, "${EMPTY}")]
    #[case("a  b", SeparatorKind::Space, "a \\ b")]
    #[case("a   b", SeparatorKind::Space, "a \\ \\ b")]
    #[case(" a ", SeparatorKind::Space, "\\ a\\ ")]
    #[case("a\tb", SeparatorKind::Space, "a\\tb")]
    #[case("a\tb", SeparatorKind::Tab, "a\\tb")]
    #[case("a  b", SeparatorKind::Tab, "a  b")]
    #[case("a | b", SeparatorKind::Pipe, "a \\| b")]
    #[case("|", SeparatorKind::Pipe, "\\|")]
    #[case("a|b", SeparatorKind::Pipe, "a|b")]
    #[case("a \\| b", SeparatorKind::Pipe, "a \\| b")]
    fn cells_are_escaped_for_their_separator(
        #[case] text: &str,
        #[case] kind: SeparatorKind,
        #[case] expected: &str,
    ) {
        assert_eq!(escape_cell(text, kind), expected);
    }

    #[rstest]
    #[case("a  b", SeparatorStrategy::Space)]
    #[case(" lead", SeparatorStrategy::Space)]
    #[case("x | y", SeparatorStrategy::Pipe)]
    #[case("a\tb", SeparatorStrategy::Tab)]
    fn escaped_cells_split_back_into_one_cell(
        #[case] text: &str,
        #[case] strategy: SeparatorStrategy,
    ) {
        let cell = escape_cell(text, strategy.kind());
        let line = match strategy {
            SeparatorStrategy::Pipe => format!("| Log | {cell} |"),
            SeparatorStrategy::Space => format!("Log    {cell}"),
            SeparatorStrategy::Tab => format!("Log\t{cell}"),
        };
        // Pipe rows also count the leading and trailing pipes.
        let expected = match strategy {
            SeparatorStrategy::Pipe => 3,
            _ => 1,
        };
        assert_eq!(split(strategy, &line).len(), expected);
    }

    #[rstest]
    #[case(FileFormat::Txt, "| Log |", SeparatorStrategy::Pipe)]
    #[case(FileFormat::Txt, " | Log |", SeparatorStrategy::Pipe)]
    #[case(FileFormat::Txt, "|", SeparatorStrategy::Pipe)]
    #[case(FileFormat::Txt, "|Log", SeparatorStrategy::Space)]
    #[case(FileFormat::Txt, "Log  x", SeparatorStrategy::Space)]
    #[case(FileFormat::Tsv, "| Log |", SeparatorStrategy::Tab)]
    fn strategy_is_chosen_per_line(
        #[case] format: FileFormat,
        #[case] line: &str,
        #[case] expected: SeparatorStrategy,
    ) {
        assert_eq!(SeparatorStrategy::for_line(format, line), expected);
    }
}

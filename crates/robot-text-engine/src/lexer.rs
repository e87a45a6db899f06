//! Tokenizer: one physical line in, positioned cells and separators out.
//!
//! Cells are numbered from the first logical column. In pipe lines the
//! opening `|` does not start a cell, so `| | Log |` has `Log` in cell 1 just
//! like the space-separated `    Log`. Leading empty cells are indentation
//! and produce no token; empty cells between two non-empty cells produce an
//! empty token; blank text outside the content area is kept as separator
//! text.

use crate::recognizer::RecognizerSet;
use crate::separators::{Separator, SeparatorStrategy};
use crate::tokens::{FilePosition, RobotToken};

#[derive(Debug, Clone)]
pub struct LexedCell {
    pub token: RobotToken,
    /// Logical column index of the cell on its line.
    pub cell: usize,
}

#[derive(Debug, Clone)]
pub enum Lexeme {
    Cell(LexedCell),
    Separator(Separator),
}

#[derive(Debug, Clone)]
pub struct LexedLine {
    pub number: usize,
    pub strategy: SeparatorStrategy,
    pub items: Vec<Lexeme>,
}

impl LexedLine {
    pub fn cells(&self) -> impl Iterator<Item = &LexedCell> {
        self.items.iter().filter_map(|item| match item {
            Lexeme::Cell(cell) => Some(cell),
            Lexeme::Separator(_) => None,
        })
    }

    pub fn is_blank(&self) -> bool {
        self.cells().next().is_none()
    }
}

pub struct Tokenizer {
    recognizers: RecognizerSet,
}

impl Tokenizer {
    pub fn new(recognizers: RecognizerSet) -> Self {
        Self { recognizers }
    }

    pub fn recognizers(&self) -> &RecognizerSet {
        &self.recognizers
    }

    /// Split `line` (without its line terminator) into cells and separators.
    /// `start` is the position of the line's first byte.
    pub fn tokenize(&self, line: &str, start: FilePosition, strategy: SeparatorStrategy) -> LexedLine {
        let separators: Vec<Separator> = strategy.separators(line, start).collect();

        // Field k lies between separator k-1 and separator k.
        let mut fields = Vec::with_capacity(separators.len() + 1);
        let mut cursor = 0;
        for separator in &separators {
            fields.push((cursor, separator.start()));
            cursor = separator.end();
        }
        fields.push((cursor, line.len()));

        let opens_with_pipe = strategy == SeparatorStrategy::Pipe
            && separators.first().is_some_and(|s| s.start() == 0);
        let first_cell_field = usize::from(opens_with_pipe);

        let is_content = |(from, to): (usize, usize)| !line[from..to].trim().is_empty();
        let first = fields.iter().position(|&f| is_content(f));
        let last = fields.iter().rposition(|&f| is_content(f));

        let mut items = Vec::with_capacity(fields.len() + separators.len());
        let mut separators = separators.into_iter();
        for (index, &(from, to)) in fields.iter().enumerate() {
            let in_content = matches!((first, last), (Some(f), Some(l)) if (f..=l).contains(&index));
            let in_cell_area = index >= first_cell_field;
            if in_content && in_cell_area {
                let raw = &line[from..to];
                items.push(Lexeme::Cell(LexedCell {
                    token: self.recognize(raw, start.advanced_by(from)),
                    cell: index - first_cell_field,
                }));
            } else if from < to {
                items.push(Lexeme::Separator(Separator {
                    kind: strategy.kind(),
                    text: line[from..to].to_string(),
                    position: start.advanced_by(from),
                }));
            }
            if let Some(separator) = separators.next() {
                items.push(Lexeme::Separator(separator));
            }
        }

        LexedLine {
            number: start.line,
            strategy,
            items,
        }
    }

    fn recognize(&self, raw: &str, position: FilePosition) -> RobotToken {
        let mut token = RobotToken::parsed(raw, position);
        token.set_types(self.recognizers.candidate_types(raw));
        token
    }
}

//! # Table parser
//!
//! Turns text into a [`RobotFile`] one physical line at a time:
//!
//! 1. the line's [`SeparatorStrategy`] is chosen and the [`Tokenizer`] cuts it
//!    into positioned cells with recognizer candidates;
//! 2. a `...` first cell restores the context saved at the end of the
//!    previous logical row, anything else starts a fresh row;
//! 3. every cell is typed: comments first, then table headers, then the
//!    ordered mapper list for the current [`ParsingState`];
//! 4. the line is handed to its owner in the model.
//!
//! Parsing never fails. Text that cannot be classified stays in the model as
//! `Unknown` tokens and anything noteworthy is reported as a [`Diagnostic`].
//!
//! ## Modules
//!
//! - **`state`**: [`ParsingState`] and [`ParsingStack`]
//! - **`mappers`**: the ordered `(can_map, map)` list
//! - **`builder`**: model construction and line ownership
//! - **`row`**: executable row cell typing
//! - **`row_descriptor`**: [`RowDescriptor`] queries over parsed rows
//! - **`variables`**: variable reference scanning
//! - **`fixers`**: whole-file passes run after the last line
//! - **`diagnostics`**: [`Diagnostic`] and [`ProblemReporter`]

mod builder;
mod diagnostics;
pub(crate) mod fixers;
mod mappers;
pub(crate) mod row;
mod row_descriptor;
mod state;
pub mod variables;

pub use diagnostics::{Diagnostic, DiagnosticKind, ProblemReporter, Severity, report_all};
pub use row_descriptor::{RowDescriptor, RowKind, UsedVariable};
pub use state::{ParsingStack, ParsingState, RowPhase};

use crate::format::FileFormat;
use crate::lexer::Tokenizer;
use crate::model::{RobotFile, split_lines};
use crate::recognizer::RecognizerSet;
use crate::separators::SeparatorStrategy;
use crate::tokens::{FilePosition, TokenType};
use crate::version::RobotVersion;
use builder::{ModelBuilder, PendingCell};
use mappers::MappingInput;
use serde::Serialize;

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Passed,
    Failed,
}

/// A parsed file and what the parser had to say about it.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub file: RobotFile,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// `Failed` when any diagnostic is an error.
    pub fn status(&self) -> Status {
        if self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
        {
            Status::Failed
        } else {
            Status::Passed
        }
    }

    /// Forward diagnostics to a downstream reporter, which may stop the
    /// forwarding early. Returns how many were delivered.
    pub fn report_to(&self, reporter: &mut impl ProblemReporter) -> usize {
        report_all(&self.diagnostics, reporter)
    }
}

/// Parser for one file format and language version. Cheap to build; the
/// recognizer patterns are compiled once per process.
pub struct RobotParser {
    format: FileFormat,
    tokenizer: Tokenizer,
}

impl RobotParser {
    pub fn new(format: FileFormat, version: RobotVersion) -> Self {
        Self {
            format,
            tokenizer: Tokenizer::new(RecognizerSet::for_version(version)),
        }
    }

    pub fn version(&self) -> RobotVersion {
        self.tokenizer.recognizers().version()
    }

    pub fn parse(&self, text: &str) -> ParseOutput {
        let (has_bom, body) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let mut builder = ModelBuilder::new(self.format, self.tokenizer.recognizers().clone());
        builder.file.has_bom = has_bom;

        let mut offset = if has_bom { BOM.len_utf8() } else { 0 };
        for (index, (content, eol)) in split_lines(body).into_iter().enumerate() {
            let strategy = SeparatorStrategy::for_line(self.format, content);
            let start = FilePosition::new(index + 1, 0, offset);
            let lexed = self.tokenizer.tokenize(content, start, strategy);
            let cells = builder.begin_line(lexed, eol);
            parse_line(&mut builder, &cells);
            builder.finish_line();
            offset += content.len() + eol.len();
        }

        let (mut file, diagnostics) = builder.finish();
        fixers::apply_template_arguments(&mut file);
        file.clear_dirty();
        log::info!(
            "parsed {} lines into {} tokens ({} diagnostics)",
            file.lines().len(),
            file.tokens.len(),
            diagnostics.len()
        );
        ParseOutput { file, diagnostics }
    }
}

/// Parse `text` with a fresh [`RobotParser`].
pub fn parse_text(text: &str, format: FileFormat, version: RobotVersion) -> ParseOutput {
    RobotParser::new(format, version).parse(text)
}

fn is_inside_table(state: ParsingState) -> bool {
    !matches!(state, ParsingState::OutsideTable | ParsingState::Trash)
}

fn parse_line(builder: &mut ModelBuilder, cells: &[PendingCell]) {
    let continued = cells.first().is_some_and(|first| {
        first.candidates.contains(&TokenType::PreviousLineContinue)
            && is_inside_table(builder.stack.current())
    });
    let restored = match cells.first() {
        Some(first) if continued => {
            builder.classify(first.id, TokenType::PreviousLineContinue, &[]);
            builder.continue_row(first.position)
        }
        _ => false,
    };
    if !restored {
        builder.stack.start_line();
    }

    let mut reported_outside = false;
    for (index, cell) in cells.iter().enumerate() {
        if continued && index == 0 {
            continue;
        }
        if builder.line.comment_mode {
            builder.classify(cell.id, TokenType::CommentContinue, &[]);
            builder.attach_comment(cell.id, cell.cell);
            continue;
        }
        if cell.candidates.contains(&TokenType::StartHashComment) {
            builder.line.comment_mode = true;
            builder.classify(cell.id, TokenType::StartHashComment, &[]);
            builder.attach_comment(cell.id, cell.cell);
            continue;
        }
        if index == 0 && cell.cell == 0 && let Some(header) = header_type(cell) {
            open_table(builder, cell, header);
            continue;
        }
        if builder.line.dangling {
            builder.classify(cell.id, TokenType::Unknown, &[]);
            continue;
        }
        if builder.line.header_section.is_some() {
            builder.classify(cell.id, TokenType::TableHeaderColumn, &[]);
            builder.push_header_column(cell.id);
            continue;
        }

        let state = builder.stack.current();
        match state {
            ParsingState::OutsideTable => {
                builder.classify(cell.id, TokenType::Unknown, &[]);
                if !reported_outside {
                    reported_outside = true;
                    builder.report(
                        Severity::Warning,
                        DiagnosticKind::ContentOutsideTable,
                        format!("'{}' is outside of any table", cell.text),
                        cell.position,
                    );
                }
            }
            ParsingState::Trash => builder.classify(cell.id, TokenType::Unknown, &[]),
            _ => {
                let input = MappingInput {
                    state,
                    cell,
                    has_open: builder.line.open.is_some(),
                    has_holder: builder.has_holder(),
                };
                if !mappers::map_token(builder, &input) {
                    log::debug!(
                        "line {}: no mapper for {:?} in {state:?}",
                        builder.line.index + 1,
                        cell.text
                    );
                    builder.classify(cell.id, TokenType::Unknown, &[]);
                }
            }
        }
    }
}

fn header_type(cell: &PendingCell) -> Option<TokenType> {
    cell.candidates
        .iter()
        .copied()
        .find(|t| t.is_table_header())
}

fn open_table(builder: &mut ModelBuilder, cell: &PendingCell, header: TokenType) {
    let kind = match header {
        TokenType::TableHeader(kind) => Some(kind),
        _ => None,
    };
    builder.classify(cell.id, header, &[]);
    if kind.is_none() {
        builder.report(
            Severity::Warning,
            DiagnosticKind::UnknownTableHeader,
            format!("unknown table '{}', its content is ignored", cell.text),
            cell.position,
        );
    }
    builder.check_deprecated(cell, header);
    builder.open_section(kind, cell.id);
}

#[cfg(test)]
mod tests;

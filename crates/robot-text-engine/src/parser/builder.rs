//! Incremental construction of a [`RobotFile`] while lines are parsed.
//!
//! The builder owns the file under construction, the parsing stack and the
//! per-line bookkeeping that decides which node owns each physical line.

use super::diagnostics::{Diagnostic, DiagnosticKind, Severity};
use super::state::{ParsingStack, ParsingState};
use crate::format::FileFormat;
use crate::lexer::{LexedCell, LexedLine, Lexeme};
use crate::model::{
    ElementKind, ElementPath, ExecutableHolder, LineElement, ModelElement, RobotFile, RobotLine,
    Section, TableKind,
};
use crate::recognizer::RecognizerSet;
use crate::tokens::{FilePosition, TokenId, TokenType};

/// A cell of the current line after its token went into the arena.
#[derive(Debug, Clone)]
pub(crate) struct PendingCell {
    pub id: TokenId,
    pub cell: usize,
    pub text: String,
    /// Recognizer matches, without `Unknown`.
    pub candidates: Vec<TokenType>,
    pub position: Option<FilePosition>,
}

/// Node that receives blank, comment-only and unmapped lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineOwner {
    Preamble,
    Section(usize),
    Holder(TableKind, usize),
    Element(ElementPath),
}

/// Saved context of the last logical row, restored by `...`.
#[derive(Debug, Clone)]
struct Continuation {
    stack: ParsingStack,
    element: ElementPath,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LineState {
    pub index: usize,
    /// Element the line's tokens are being attached to.
    pub open: Option<ElementPath>,
    /// Section whose header is on this line.
    pub header_section: Option<usize>,
    /// A holder name was read on this line.
    pub holder_started: bool,
    /// A `#` cell was seen; the rest of the line is comment.
    pub comment_mode: bool,
    /// `...` with nothing to continue.
    pub dangling: bool,
}

pub(crate) struct ModelBuilder {
    pub(crate) file: RobotFile,
    pub(crate) stack: ParsingStack,
    pub(crate) recognizers: RecognizerSet,
    pub(crate) line: LineState,
    diagnostics: Vec<Diagnostic>,
    section: Option<usize>,
    holder: Option<(TableKind, usize)>,
    owner: LineOwner,
    continuation: Option<Continuation>,
}

impl ModelBuilder {
    pub(crate) fn new(format: FileFormat, recognizers: RecognizerSet) -> Self {
        Self {
            file: RobotFile::new(format, recognizers.version()),
            stack: ParsingStack::new(),
            recognizers,
            line: LineState::default(),
            diagnostics: Vec::new(),
            section: None,
            holder: None,
            owner: LineOwner::Preamble,
            continuation: None,
        }
    }

    pub(crate) fn finish(self) -> (RobotFile, Vec<Diagnostic>) {
        (self.file, self.diagnostics)
    }

    /// Move the line's tokens into the arena and record the physical line.
    pub(crate) fn begin_line(&mut self, lexed: LexedLine, eol: &str) -> Vec<PendingCell> {
        let index = self.file.lines.len();
        self.line = LineState {
            index,
            ..LineState::default()
        };

        let mut elements = Vec::with_capacity(lexed.items.len());
        let mut cells = Vec::new();
        for item in lexed.items {
            match item {
                Lexeme::Cell(LexedCell { token, cell }) => {
                    let text = token.text().to_string();
                    let candidates = token
                        .types()
                        .iter()
                        .copied()
                        .filter(|t| *t != TokenType::Unknown)
                        .collect();
                    let position = token.position();
                    let id = self.file.add_token(token);
                    elements.push(LineElement::Token(id));
                    cells.push(PendingCell {
                        id,
                        cell,
                        text,
                        candidates,
                        position,
                    });
                }
                Lexeme::Separator(separator) => elements.push(LineElement::Separator(separator)),
            }
        }
        self.file.lines.push(RobotLine {
            number: lexed.number,
            elements,
            eol: eol.to_string(),
        });
        cells
    }

    /// Pick the previous row up again for a `...` line. Returns false (and
    /// marks the line dangling) when there is nothing to continue.
    pub(crate) fn continue_row(&mut self, position: Option<FilePosition>) -> bool {
        match self.continuation.clone() {
            Some(continuation) => {
                self.stack = continuation.stack;
                self.line.open = Some(continuation.element);
                if let Some(element) = self.file.element_at_path_mut(continuation.element) {
                    element.break_row();
                }
                true
            }
            None => {
                self.line.dangling = true;
                self.report(
                    Severity::Warning,
                    DiagnosticKind::DanglingContinuation,
                    "'...' has no previous row to continue".to_string(),
                    position,
                );
                false
            }
        }
    }

    pub(crate) fn open_section(&mut self, kind: Option<TableKind>, header: TokenId) {
        let index = self.file.sections.len();
        self.file
            .sections
            .push(Section::new(kind, header, Some(self.line.index)));
        self.section = Some(index);
        self.holder = None;
        self.line.header_section = Some(index);
        self.stack.open_table(kind);
        self.continuation = None;
        log::debug!("line {}: opened table {kind:?}", self.line.index + 1);
    }

    pub(crate) fn push_header_column(&mut self, token: TokenId) {
        if let Some(section) = self
            .line
            .header_section
            .and_then(|s| self.file.sections.get_mut(s))
        {
            section.push_column(token);
        }
    }

    pub(crate) fn has_holder(&self) -> bool {
        self.holder.is_some()
    }

    /// Start a test case, task or keyword named by `name`.
    pub(crate) fn start_holder(&mut self, name: TokenId) -> bool {
        let (Some(table), Some(section)) = (self.stack.table(), self.section) else {
            return false;
        };
        let Some(kind) = table.holder() else {
            return false;
        };
        let Some(holders) = self.file.holder_table_mut(table).map(|t| &mut t.holders) else {
            return false;
        };
        let mut holder = ExecutableHolder::new(kind, name, section);
        holder.header_line = Some(self.line.index);
        holders.push(holder);
        self.holder = Some((table, holders.len() - 1));
        self.line.holder_started = true;
        self.stack.pop_to_table();
        self.stack.push(ParsingState::Holder(kind));
        true
    }

    /// Create an element and make it the line's open element. Body elements
    /// go to the current holder; `None` when there is no place for it.
    pub(crate) fn start_element(
        &mut self,
        kind: ElementKind,
        declaration: Option<TokenId>,
    ) -> Option<ElementPath> {
        let mut element = ModelElement::new(kind);
        element.parsed = true;
        element.section = self.section.unwrap_or_default();
        if let Some(token) = declaration {
            element.set_declaration(token);
        }

        let path = match kind.holder() {
            None => {
                let table = kind.table();
                let elements = &mut self.file.element_table_mut(table)?.elements;
                elements.push(element);
                ElementPath {
                    table,
                    holder: None,
                    index: elements.len() - 1,
                }
            }
            Some(holder_kind) => {
                let (table, holder) = self.holder.filter(|(t, _)| *t == holder_kind.table())?;
                element.shares_holder_line = self.line.holder_started;
                let elements = &mut self.file.holder_table_mut(table)?.holders.get_mut(holder)?.elements;
                elements.push(element);
                ElementPath {
                    table,
                    holder: Some(holder),
                    index: elements.len() - 1,
                }
            }
        };
        self.line.open = Some(path);
        Some(path)
    }

    /// The line's open element when it has the given kind.
    pub(crate) fn open_element(&self, kind: ElementKind) -> Option<ElementPath> {
        self.line
            .open
            .filter(|path| self.file.element_at_path(*path).is_some_and(|e| e.kind() == kind))
    }

    pub(crate) fn open_element_types(&self) -> Vec<Vec<TokenType>> {
        self.line
            .open
            .and_then(|path| self.file.element_at_path(path))
            .map(|element| {
                element
                    .declaration()
                    .iter()
                    .chain(element.values())
                    .map(|id| self.file.token(*id).types().to_vec())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn attach_value(&mut self, path: ElementPath, token: TokenId) {
        if let Some(element) = self.file.element_at_path_mut(path) {
            element.push_value(token);
        }
    }

    /// Attach a comment token to the nearest node that owns the line.
    pub(crate) fn attach_comment(&mut self, token: TokenId, cell: usize) {
        if let Some(element) = self.line.open.and_then(|p| self.file.element_at_path_mut(p)) {
            element.push_comment(token);
            return;
        }
        if self.line.holder_started
            && let Some(holder) = self.current_holder_mut()
        {
            holder.push_comment(token);
            return;
        }
        if let Some(section) = self
            .line
            .header_section
            .and_then(|s| self.file.sections.get_mut(s))
        {
            section.push_comment(token);
            return;
        }
        // An indented comment in a body is a comment-only row.
        if cell >= 1
            && !self.line.dangling
            && let Some(kind) = self.stack.holder()
            && let Some(path) = self.start_element(ElementKind::ExecutableRow(kind), None)
            && let Some(element) = self.file.element_at_path_mut(path)
        {
            element.push_comment(token);
        }
    }

    /// Replace a token's types with `primary` followed by `extras`.
    pub(crate) fn classify(&mut self, token: TokenId, primary: TokenType, extras: &[TokenType]) {
        let mut types = Vec::with_capacity(1 + extras.len());
        types.push(primary);
        types.extend_from_slice(extras);
        self.file.token_mut(token).set_types(types);
    }

    pub(crate) fn set_types(&mut self, token: TokenId, types: Vec<TokenType>) {
        self.file.token_mut(token).set_types(types);
    }

    pub(crate) fn report(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        message: String,
        position: Option<FilePosition>,
    ) {
        if severity == Severity::Error {
            log::warn!("{message}");
        } else {
            log::debug!("{message}");
        }
        self.diagnostics.push(Diagnostic {
            severity,
            kind,
            message,
            position,
        });
    }

    /// Warn when `text` was recognised as `token_type` through a deprecated
    /// spelling.
    pub(crate) fn check_deprecated(&mut self, cell: &PendingCell, token_type: TokenType) {
        if self.recognizers.is_deprecated(&cell.text, token_type) {
            self.report(
                Severity::Warning,
                DiagnosticKind::DeprecatedSyntax,
                format!(
                    "'{}' is deprecated in Robot Framework {}",
                    cell.text,
                    self.recognizers.version()
                ),
                cell.position,
            );
        }
    }

    /// Decide who owns the line that was just parsed.
    pub(crate) fn finish_line(&mut self) {
        let index = self.line.index;
        if let Some(section) = self.line.header_section {
            self.owner = LineOwner::Section(section);
            return;
        }
        if let Some(path) = self.line.open {
            let present = match self.file.element_at_path_mut(path) {
                Some(element) => {
                    element.own_line(index, true);
                    element.is_present()
                }
                None => false,
            };
            self.owner = LineOwner::Element(path);
            self.continuation = present.then(|| Continuation {
                stack: self.stack.clone(),
                element: path,
            });
            return;
        }
        if self.line.holder_started
            && let Some((table, holder)) = self.holder
        {
            self.owner = LineOwner::Holder(table, holder);
            self.continuation = None;
            return;
        }
        self.own_trivia(index);
    }

    fn own_trivia(&mut self, index: usize) {
        match self.owner {
            LineOwner::Preamble => self.file.preamble.push(index),
            LineOwner::Section(section) => {
                if let Some(section) = self.file.sections.get_mut(section) {
                    section.trailing.push(index);
                }
            }
            LineOwner::Holder(table, holder) => {
                if let Some(holder) = self
                    .file
                    .holder_table_mut(table)
                    .and_then(|t| t.holders.get_mut(holder))
                {
                    holder.trailing.push(index);
                }
            }
            LineOwner::Element(path) => {
                if let Some(element) = self.file.element_at_path_mut(path) {
                    element.own_line(index, false);
                }
            }
        }
    }

    fn current_holder_mut(&mut self) -> Option<&mut ExecutableHolder> {
        let (table, holder) = self.holder?;
        self.file.holder_table_mut(table)?.holders.get_mut(holder)
    }
}

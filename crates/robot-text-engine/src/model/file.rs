use super::{
    ElementId, ElementTable, ExecutableHolder, HolderTable, ModelElement, RobotLine, Section,
    TableKind,
};
use crate::format::FileFormat;
use crate::separators::SeparatorKind;
use crate::tokens::{RobotToken, TokenId, TokenType};
use crate::version::RobotVersion;
use std::path::{Path, PathBuf};

/// Address of an element inside a file. Only valid until the next
/// structural edit; use [`ElementId`] to refer to elements across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPath {
    pub table: TableKind,
    pub holder: Option<usize>,
    pub index: usize,
}

/// Root of the document model.
///
/// Owns every token (in an append-only arena), the physical lines they came
/// from, the section headers in file order and one table of each kind.
#[derive(Debug, Clone)]
pub struct RobotFile {
    processed_file: Option<PathBuf>,
    format: FileFormat,
    version: RobotVersion,
    pub(crate) has_bom: bool,
    pub(crate) tokens: Vec<RobotToken>,
    pub(crate) lines: Vec<RobotLine>,
    pub(crate) preamble: Vec<usize>,
    pub(crate) sections: Vec<Section>,
    pub(crate) settings: ElementTable,
    pub(crate) variables: ElementTable,
    pub(crate) test_cases: HolderTable,
    pub(crate) tasks: HolderTable,
    pub(crate) keywords: HolderTable,
    pub(crate) edit_version: u64,
}

impl RobotFile {
    pub fn new(format: FileFormat, version: RobotVersion) -> Self {
        Self {
            processed_file: None,
            format,
            version,
            has_bom: false,
            tokens: Vec::new(),
            lines: Vec::new(),
            preamble: Vec::new(),
            sections: Vec::new(),
            settings: ElementTable::new(TableKind::Settings),
            variables: ElementTable::new(TableKind::Variables),
            test_cases: HolderTable::new(TableKind::TestCases),
            tasks: HolderTable::new(TableKind::Tasks),
            keywords: HolderTable::new(TableKind::Keywords),
            edit_version: 0,
        }
    }

    /// File the model was read from, for diagnostics.
    pub fn processed_file(&self) -> Option<&Path> {
        self.processed_file.as_deref()
    }

    pub fn set_processed_file(&mut self, path: impl Into<PathBuf>) {
        self.processed_file = Some(path.into());
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn version(&self) -> RobotVersion {
        self.version
    }

    /// Incremented by every successful edit command.
    pub fn edit_version(&self) -> u64 {
        self.edit_version
    }

    /// Token by id. Ids handed out by this file always resolve; `None` for
    /// an id that belongs to another file.
    pub fn get_token(&self, id: TokenId) -> Option<&RobotToken> {
        self.tokens.get(id.0)
    }

    pub fn get_token_text(&self, id: TokenId) -> Option<&str> {
        self.get_token(id).map(RobotToken::text)
    }

    /// Ids stored in the model always come from this file's arena.
    pub(crate) fn token(&self, id: TokenId) -> &RobotToken {
        &self.tokens[id.0]
    }

    pub(crate) fn token_text(&self, id: TokenId) -> &str {
        self.token(id).text()
    }

    pub fn lines(&self) -> &[RobotLine] {
        &self.lines
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn setting_table(&self) -> &ElementTable {
        &self.settings
    }

    pub fn variable_table(&self) -> &ElementTable {
        &self.variables
    }

    pub fn test_case_table(&self) -> &HolderTable {
        &self.test_cases
    }

    pub fn task_table(&self) -> &HolderTable {
        &self.tasks
    }

    pub fn keyword_table(&self) -> &HolderTable {
        &self.keywords
    }

    /// A table is present once a header for it exists in the file.
    pub fn has_table(&self, kind: TableKind) -> bool {
        self.sections.iter().any(|s| s.kind() == Some(kind))
    }

    pub fn element_table(&self, kind: TableKind) -> Option<&ElementTable> {
        match kind {
            TableKind::Settings => Some(&self.settings),
            TableKind::Variables => Some(&self.variables),
            _ => None,
        }
    }

    pub fn holder_table(&self, kind: TableKind) -> Option<&HolderTable> {
        match kind {
            TableKind::TestCases => Some(&self.test_cases),
            TableKind::Tasks => Some(&self.tasks),
            TableKind::Keywords => Some(&self.keywords),
            _ => None,
        }
    }

    pub(crate) fn element_table_mut(&mut self, kind: TableKind) -> Option<&mut ElementTable> {
        match kind {
            TableKind::Settings => Some(&mut self.settings),
            TableKind::Variables => Some(&mut self.variables),
            _ => None,
        }
    }

    pub(crate) fn holder_table_mut(&mut self, kind: TableKind) -> Option<&mut HolderTable> {
        match kind {
            TableKind::TestCases => Some(&mut self.test_cases),
            TableKind::Tasks => Some(&mut self.tasks),
            TableKind::Keywords => Some(&mut self.keywords),
            _ => None,
        }
    }

    /// Every holder of every executable table.
    pub fn holders(&self) -> impl Iterator<Item = &ExecutableHolder> {
        self.test_cases
            .holders
            .iter()
            .chain(&self.tasks.holders)
            .chain(&self.keywords.holders)
    }

    /// Every element in the file, table by table.
    pub fn elements(&self) -> impl Iterator<Item = &ModelElement> {
        self.settings
            .elements
            .iter()
            .chain(&self.variables.elements)
            .chain(self.holders().flat_map(|h| h.elements.iter()))
    }

    pub fn element(&self, id: ElementId) -> Option<&ModelElement> {
        self.find_element(id).and_then(|path| self.element_at_path(path))
    }

    pub fn holder(&self, id: ElementId) -> Option<&ExecutableHolder> {
        self.holders().find(|h| h.id() == id)
    }

    pub fn find_element(&self, id: ElementId) -> Option<ElementPath> {
        for table in [TableKind::Settings, TableKind::Variables] {
            if let Some(index) = self
                .element_table(table)
                .and_then(|t| t.elements.iter().position(|e| e.id() == id))
            {
                return Some(ElementPath {
                    table,
                    holder: None,
                    index,
                });
            }
        }
        for table in [TableKind::TestCases, TableKind::Tasks, TableKind::Keywords] {
            let Some(holders) = self.holder_table(table).map(|t| &t.holders) else {
                continue;
            };
            for (holder_index, holder) in holders.iter().enumerate() {
                if let Some(index) = holder.elements.iter().position(|e| e.id() == id) {
                    return Some(ElementPath {
                        table,
                        holder: Some(holder_index),
                        index,
                    });
                }
            }
        }
        None
    }

    pub fn find_holder(&self, id: ElementId) -> Option<(TableKind, usize)> {
        [TableKind::TestCases, TableKind::Tasks, TableKind::Keywords]
            .into_iter()
            .find_map(|table| {
                let holders = &self.holder_table(table)?.holders;
                holders
                    .iter()
                    .position(|h| h.id() == id)
                    .map(|index| (table, index))
            })
    }

    pub fn element_at_path(&self, path: ElementPath) -> Option<&ModelElement> {
        match path.holder {
            None => self.element_table(path.table)?.elements.get(path.index),
            Some(holder) => self
                .holder_table(path.table)?
                .holders
                .get(holder)?
                .elements
                .get(path.index),
        }
    }

    pub(crate) fn element_at_path_mut(&mut self, path: ElementPath) -> Option<&mut ModelElement> {
        self.siblings_mut(path)?.get_mut(path.index)
    }

    /// The element list `path` indexes into.
    pub(crate) fn siblings_mut(&mut self, path: ElementPath) -> Option<&mut Vec<ModelElement>> {
        match path.holder {
            None => Some(&mut self.element_table_mut(path.table)?.elements),
            Some(holder) => Some(
                &mut self
                    .holder_table_mut(path.table)?
                    .holders
                    .get_mut(holder)?
                    .elements,
            ),
        }
    }

    pub(crate) fn add_token(&mut self, token: RobotToken) -> TokenId {
        self.tokens.push(token);
        TokenId(self.tokens.len() - 1)
    }

    pub(crate) fn token_mut(&mut self, id: TokenId) -> &mut RobotToken {
        &mut self.tokens[id.0]
    }

    /// Last section of `kind`, appending a generated header when the table
    /// does not exist yet.
    pub(crate) fn ensure_section(&mut self, kind: TableKind) -> usize {
        if let Some(index) = self.sections.iter().rposition(|s| s.kind() == Some(kind)) {
            return index;
        }
        let header = self.add_token(RobotToken::created(
            kind.default_header(),
            TokenType::TableHeader(kind),
        ));
        self.sections.push(Section::new(Some(kind), header, None));
        self.sections.len() - 1
    }

    /// Separator style new or edited cells are written with when their line
    /// does not show one.
    pub(crate) fn default_separator(&self) -> SeparatorKind {
        match self.format {
            FileFormat::Tsv => SeparatorKind::Tab,
            FileFormat::Txt => SeparatorKind::Space,
        }
    }

    /// Reset every dirty flag; the current state becomes the new baseline.
    pub fn clear_dirty(&mut self) {
        let fallback = self.default_separator();
        for line in &self.lines {
            let kind = match self.format {
                FileFormat::Tsv => SeparatorKind::Tab,
                FileFormat::Txt => line.separator_kind().unwrap_or(fallback),
            };
            for id in line.tokens() {
                self.tokens[id.0].clear_dirty(kind);
            }
        }
        for token in &mut self.tokens {
            token.clear_dirty(fallback);
        }
        for element in self.settings.elements.iter_mut().chain(&mut self.variables.elements) {
            element.clear_dirty();
        }
        for table in [&mut self.test_cases, &mut self.tasks, &mut self.keywords] {
            for holder in &mut table.holders {
                for element in &mut holder.elements {
                    element.clear_dirty();
                }
            }
        }
    }

    /// Anything changed since the last parse or [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.tokens.iter().any(RobotToken::is_dirty)
            || self.elements().any(ModelElement::is_structure_dirty)
    }
}

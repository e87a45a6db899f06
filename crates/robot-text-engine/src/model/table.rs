use super::{ElementKind, ExecutableHolder, ModelElement, SettingKind, TableKind};
use crate::tokens::TokenId;

/// One `*** Header ***` occurrence. A table may be split over several
/// sections when its header repeats; user tables and the Comments table are
/// sections without a model table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    kind: Option<TableKind>,
    header: TokenId,
    columns: Vec<TokenId>,
    comments: Vec<TokenId>,
    /// `None` when the header was generated by an edit.
    pub(crate) header_line: Option<usize>,
    pub(crate) trailing: Vec<usize>,
}

impl Section {
    pub(crate) fn new(kind: Option<TableKind>, header: TokenId, header_line: Option<usize>) -> Self {
        Self {
            kind,
            header,
            columns: Vec::new(),
            comments: Vec::new(),
            header_line,
            trailing: Vec::new(),
        }
    }

    /// `None` for a user-defined table.
    pub fn kind(&self) -> Option<TableKind> {
        self.kind
    }

    pub fn header(&self) -> TokenId {
        self.header
    }

    pub fn columns(&self) -> &[TokenId] {
        &self.columns
    }

    pub fn comments(&self) -> &[TokenId] {
        &self.comments
    }

    pub(crate) fn push_column(&mut self, token: TokenId) {
        self.columns.push(token);
    }

    pub(crate) fn push_comment(&mut self, token: TokenId) {
        self.comments.push(token);
    }
}

/// Settings or Variables table: a flat list of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTable {
    kind: TableKind,
    pub(crate) elements: Vec<ModelElement>,
}

impl ElementTable {
    pub(crate) fn new(kind: TableKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn elements(&self) -> &[ModelElement] {
        &self.elements
    }

    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &ModelElement> {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    /// Last declaration of a suite setting; earlier repeats are kept for
    /// dumping but are not authoritative.
    pub fn setting(&self, kind: SettingKind) -> Option<&ModelElement> {
        self.of_kind(ElementKind::Setting(kind)).last()
    }

    /// Library, Resource and Variables imports in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements.iter().filter(|e| {
            matches!(
                e.kind(),
                ElementKind::Setting(
                    SettingKind::Library | SettingKind::Resource | SettingKind::Variables
                )
            )
        })
    }
}

/// Test Cases, Tasks or Keywords table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderTable {
    kind: TableKind,
    pub(crate) holders: Vec<ExecutableHolder>,
}

impl HolderTable {
    pub(crate) fn new(kind: TableKind) -> Self {
        Self {
            kind,
            holders: Vec::new(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn holders(&self) -> &[ExecutableHolder] {
        &self.holders
    }
}

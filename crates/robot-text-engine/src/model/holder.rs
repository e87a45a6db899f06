use super::{ElementId, ElementKind, HolderKind, LocalSettingKind, ModelElement};
use crate::tokens::TokenId;

/// A test case, task or user keyword: a name and an ordered body of body
/// settings and executable rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableHolder {
    id: ElementId,
    kind: HolderKind,
    name: TokenId,
    comments: Vec<TokenId>,
    pub(crate) elements: Vec<ModelElement>,
    pub(crate) section: usize,
    /// Line holding the name; `None` for holders created by an edit.
    pub(crate) header_line: Option<usize>,
    /// Blank or comment lines between the name line and the first body line.
    pub(crate) trailing: Vec<usize>,
}

impl ExecutableHolder {
    pub(crate) fn new(kind: HolderKind, name: TokenId, section: usize) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            name,
            comments: Vec::new(),
            elements: Vec::new(),
            section,
            header_line: None,
            trailing: Vec::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> HolderKind {
        self.kind
    }

    pub fn name(&self) -> TokenId {
        self.name
    }

    pub fn comments(&self) -> &[TokenId] {
        &self.comments
    }

    /// Body settings and executable rows in source order.
    pub fn elements(&self) -> &[ModelElement] {
        &self.elements
    }

    pub fn settings(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e.kind(), ElementKind::LocalSetting(..)))
    }

    pub fn executable_rows(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e.kind(), ElementKind::ExecutableRow(_)))
    }

    /// Every declaration of a body setting kind; repeats are legal text.
    pub fn settings_of(&self, kind: LocalSettingKind) -> impl Iterator<Item = &ModelElement> {
        let wanted = ElementKind::LocalSetting(self.kind, kind);
        self.elements.iter().filter(move |e| e.kind() == wanted)
    }

    /// The authoritative (last) declaration of a body setting kind.
    pub fn setting(&self, kind: LocalSettingKind) -> Option<&ModelElement> {
        self.settings_of(kind).last()
    }

    pub fn element(&self, id: ElementId) -> Option<&ModelElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub(crate) fn push_comment(&mut self, token: TokenId) {
        self.comments.push(token);
    }
}

use super::ElementKind;
use crate::tokens::TokenId;
use serde::Serialize;
use uuid::Uuid;

/// Stable identity of a model node, independent of its index or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// A physical line owned by a node. Content lines carry the node's tokens;
/// the others are blank, comment-only or unmapped lines that follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedLine {
    pub index: usize,
    pub content: bool,
}

/// One setting, variable, body setting or executable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelElement {
    id: ElementId,
    kind: ElementKind,
    declaration: Option<TokenId>,
    values: Vec<TokenId>,
    comments: Vec<TokenId>,
    pub(crate) lines: Vec<OwnedLine>,
    /// Value counts at which a `...` continuation row started.
    pub(crate) breaks: Vec<usize>,
    /// Index of the section this element was read from, for table-level
    /// elements.
    pub(crate) section: usize,
    /// Tokens were added, removed or reordered since the last parse.
    pub(crate) structure_dirty: bool,
    /// The first body row written on its holder's name line.
    pub(crate) shares_holder_line: bool,
    /// Read from source, as opposed to created by an edit.
    pub(crate) parsed: bool,
}

impl ModelElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            declaration: None,
            values: Vec::new(),
            comments: Vec::new(),
            lines: Vec::new(),
            breaks: Vec::new(),
            section: 0,
            structure_dirty: false,
            shares_holder_line: false,
            parsed: false,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn declaration(&self) -> Option<TokenId> {
        self.declaration
    }

    pub fn values(&self) -> &[TokenId] {
        &self.values
    }

    pub fn comments(&self) -> &[TokenId] {
        &self.comments
    }

    /// True once a declaration token exists.
    pub fn is_present(&self) -> bool {
        self.declaration.is_some()
    }

    /// Declaration, values and comments, in that order.
    pub fn element_tokens(&self) -> Vec<TokenId> {
        self.declaration
            .iter()
            .chain(&self.values)
            .chain(&self.comments)
            .copied()
            .collect()
    }

    pub fn contains(&self, token: TokenId) -> bool {
        self.declaration == Some(token) || self.values.contains(&token) || self.comments.contains(&token)
    }

    /// Created by an edit rather than read from source.
    pub fn is_new(&self) -> bool {
        !self.parsed
    }

    /// Whether the dumper has to rebuild this element's rows from its tokens.
    pub fn needs_regeneration(&self) -> bool {
        self.structure_dirty || !self.parsed
    }

    pub fn is_structure_dirty(&self) -> bool {
        self.structure_dirty
    }

    /// Where the source split the values over continuation rows; each entry
    /// is the number of values written before that row.
    pub fn row_breaks(&self) -> &[usize] {
        &self.breaks
    }

    pub fn content_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().filter(|l| l.content).map(|l| l.index)
    }

    pub fn trivia_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().filter(|l| !l.content).map(|l| l.index)
    }

    pub(crate) fn set_declaration(&mut self, token: TokenId) {
        self.declaration = Some(token);
    }

    pub(crate) fn push_value(&mut self, token: TokenId) {
        self.values.push(token);
    }

    pub(crate) fn insert_value(&mut self, index: usize, token: TokenId) {
        self.values.insert(index, token);
        for at in &mut self.breaks {
            if *at > index {
                *at += 1;
            }
        }
        self.structure_dirty = true;
    }

    pub(crate) fn remove_value(&mut self, index: usize) -> TokenId {
        let removed = self.values.remove(index);
        for at in &mut self.breaks {
            if *at > index {
                *at -= 1;
            }
        }
        self.breaks.dedup();
        self.structure_dirty = true;
        removed
    }

    /// Remember that a continuation row starts before the next value.
    pub(crate) fn break_row(&mut self) {
        let at = self.values.len();
        if self.breaks.last() != Some(&at) {
            self.breaks.push(at);
        }
    }

    pub(crate) fn push_comment(&mut self, token: TokenId) {
        self.comments.push(token);
    }

    pub(crate) fn replace_comments(&mut self, comments: Vec<TokenId>) {
        self.comments = comments;
        self.structure_dirty = true;
    }

    pub(crate) fn change_kind(&mut self, kind: ElementKind) {
        self.kind = kind;
    }

    pub(crate) fn own_line(&mut self, index: usize, content: bool) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.index == index) {
            existing.content |= content;
            return;
        }
        self.lines.push(OwnedLine { index, content });
    }

    /// Hand trivia lines over, used when this element is removed.
    pub(crate) fn take_trivia_lines(&mut self) -> Vec<usize> {
        let trivia = self.trivia_lines().collect();
        self.lines.retain(|l| l.content);
        trivia
    }

    pub(crate) fn mark_structure_dirty(&mut self) {
        self.structure_dirty = true;
        self.shares_holder_line = false;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.structure_dirty = false;
    }
}

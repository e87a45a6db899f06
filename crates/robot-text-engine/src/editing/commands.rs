use crate::model::{ElementId, ElementKind, TableKind};
use crate::tokens::TokenId;

/// Where a new element goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOwner {
    /// The Settings or Variables table.
    Table(TableKind),
    /// A test case, task or keyword body.
    Holder(ElementId),
}

/// A model mutation. Indexes are positions within the owner's list; `None`
/// appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    SetTokenText {
        token: TokenId,
        text: String,
    },
    /// For settings and body settings the declaration is implied by `kind`
    /// and `cells` are the values; otherwise the first cell is the
    /// declaration.
    AddElement {
        owner: ElementOwner,
        kind: ElementKind,
        index: Option<usize>,
        cells: Vec<String>,
    },
    RemoveElement {
        id: ElementId,
    },
    MoveElementUp {
        id: ElementId,
    },
    MoveElementDown {
        id: ElementId,
    },
    InsertValue {
        element: ElementId,
        index: usize,
        text: String,
    },
    RemoveValue {
        element: ElementId,
        index: usize,
    },
    /// Replace the element's comment; `None` removes it.
    SetComment {
        element: ElementId,
        text: Option<String>,
    },
    AddHolder {
        table: TableKind,
        name: String,
        index: Option<usize>,
    },
    RemoveHolder {
        id: ElementId,
    },
    MoveHolderUp {
        id: ElementId,
    },
    MoveHolderDown {
        id: ElementId,
    },
}

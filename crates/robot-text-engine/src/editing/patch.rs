use crate::model::{ElementId, TableKind};
use crate::tokens::TokenId;

/// One observable change, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    TokenChanged { token: TokenId },
    TableCreated { table: TableKind },
    ElementAdded { id: ElementId, index: usize },
    ElementRemoved { id: ElementId },
    ElementMoved { id: ElementId, from: usize, to: usize },
    /// Values or comments of an element changed.
    ElementChanged { id: ElementId },
    HolderAdded { id: ElementId, index: usize },
    HolderRemoved { id: ElementId },
    HolderMoved { id: ElementId, from: usize, to: usize },
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// File edit version after the command.
    pub version: u64,
    pub events: Vec<ModelEvent>,
}

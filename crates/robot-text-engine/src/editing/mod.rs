/*!
 * # Model editing
 *
 * Edits never re-run the parser. Every change is expressed as a [`Cmd`] and
 * applied with [`RobotFile::apply`](crate::model::RobotFile::apply), which
 * patches the model in place and returns a [`Patch`] describing what
 * happened.
 *
 * ## Dirty tracking
 *
 * - Changing a token's text marks the token dirty. Its line is still dumped
 *   from source, with the new text in the old cell padding.
 * - Adding, removing or reordering an element's tokens marks the element
 *   structurally dirty. The dumper rebuilds its rows from the tokens.
 * - Elements and holders created by edits have no source lines and are
 *   always rebuilt.
 * - Moving an element or holder keeps its source lines; they are dumped at
 *   the new place.
 *
 * `RobotFile::clear_dirty` makes the current state the new baseline.
 *
 * ## Module Structure
 *
 * - **`commands`**: the [`Cmd`] enum
 * - **`patch`**: [`Patch`] and the [`ModelEvent`] log
 * - **`apply`**: command execution against a [`RobotFile`](crate::model::RobotFile)
 */

mod apply;
pub mod commands;
pub mod patch;

pub use commands::{Cmd, ElementOwner};
pub use patch::{ModelEvent, Patch};

use crate::model::{ElementId, ElementKind, TableKind};
use crate::tokens::TokenId;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("No element with id {0:?}")]
    UnknownElement(ElementId),

    #[error("No test case, task or keyword with id {0:?}")]
    UnknownHolder(ElementId),

    #[error("No token {0:?}")]
    UnknownToken(TokenId),

    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{kind:?} cannot be placed there")]
    KindMismatch { kind: ElementKind },

    #[error("{0:?} does not hold test cases, tasks or keywords")]
    NotAHolderTable(TableKind),

    #[error("{0:?} is already at the edge of its container")]
    AlreadyAtEdge(ElementId),
}

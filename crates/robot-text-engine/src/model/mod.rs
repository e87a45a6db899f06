//! # Document model
//!
//! A parsed file is a [`RobotFile`]: an arena of tokens, the physical lines
//! they were read from and a tree of tables on top.
//!
//! ## Modules
//!
//! - **`kinds`**: table, holder, setting and element kind enums
//! - **`element`**: [`ModelElement`], the one node type for settings,
//!   variables, body settings and executable rows
//! - **`holder`**: [`ExecutableHolder`] for test cases, tasks and keywords
//! - **`table`**: sections and the per-kind tables
//! - **`line`**: physical lines and their separators
//! - **`file`**: the [`RobotFile`] root
//! - **`query`**: position to node and node to range lookups
//!
//! Every physical line has exactly one owner (the preamble, a section header,
//! a holder name line or an element) so the dumper can reproduce the file
//! without consulting anything but the model.

mod element;
mod file;
mod holder;
mod kinds;
mod line;
mod query;
mod table;

pub use element::{ElementId, ModelElement, OwnedLine};
pub use file::{ElementPath, RobotFile};
pub use holder::ExecutableHolder;
pub use kinds::{
    ElementKind, HolderKind, LocalSettingKind, SettingKind, TableKind, ValueGrammar, ValueRole,
    VariableKind,
};
pub use line::{LineElement, RobotLine, split_lines};
pub use query::ModelNode;
pub use table::{ElementTable, HolderTable, Section};

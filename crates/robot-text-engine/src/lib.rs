pub mod dumper;
pub mod editing;
pub mod format;
pub mod io;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod recognizer;
pub mod separators;
pub mod tokens;
pub mod version;


// Re-export key types for easier usage
pub use dumper::{DumpOptions, LineEnding, dump};
pub use editing::{Cmd, EditError, ElementOwner, ModelEvent, Patch};
pub use format::FileFormat;
pub use io::*;
pub use model::{
    ElementId, ElementKind, ElementPath, ExecutableHolder, HolderKind, LocalSettingKind,
    ModelElement, ModelNode, RobotFile, SettingKind, TableKind, ValueRole, VariableKind,
};
pub use parser::{
    Diagnostic, DiagnosticKind, ParseOutput, ProblemReporter, RobotParser, Severity, Status,
    parse_text,
};
pub use tokens::{FilePosition, RobotToken, TokenId, TokenType};
pub use version::RobotVersion;

use crate::tokens::FilePosition;
use serde::Serialize;
use std::fmt;
use std::ops::ControlFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// `*** Something ***` that is not a known table.
    UnknownTableHeader,
    /// A header or setting spelling deprecated in the file's version.
    DeprecatedSyntax,
    /// A value token with no declaration to attach to.
    StructuralInconsistency,
    /// `...` with no previous row to continue.
    DanglingContinuation,
    UnknownSetting,
    /// Content before the first table header.
    ContentOutsideTable,
}

/// Something noteworthy found while parsing. Parsing never fails; anything
/// it cannot make sense of ends up here and as `Unknown` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub position: Option<FilePosition>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(
                f,
                "{}:{}: {:?}: {}",
                p.line,
                p.column + 1,
                self.severity,
                self.message
            ),
            None => write!(f, "{:?}: {}", self.severity, self.message),
        }
    }
}

/// Downstream consumer of diagnostics, e.g. a validation pass raising
/// editor markers. Returning `Break` stops the reporting, not the parse.
pub trait ProblemReporter {
    fn report(&mut self, diagnostic: &Diagnostic) -> ControlFlow<()>;
}

impl<F> ProblemReporter for F
where
    F: FnMut(&Diagnostic) -> ControlFlow<()>,
{
    fn report(&mut self, diagnostic: &Diagnostic) -> ControlFlow<()> {
        self(diagnostic)
    }
}

/// Forward diagnostics until the reporter asks to stop; returns how many
/// were delivered.
pub fn report_all(diagnostics: &[Diagnostic], reporter: &mut impl ProblemReporter) -> usize {
    let mut delivered = 0;
    for diagnostic in diagnostics {
        delivered += 1;
        if reporter.report(diagnostic).is_break() {
            break;
        }
    }
    delivered
}

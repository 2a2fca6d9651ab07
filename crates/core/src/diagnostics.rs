//! Advisory diagnostics collected while building the model
//!
//! Nothing reported here aborts processing. Records are only kept when the
//! parser runs in verbose mode; each record is also logged via `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What went wrong with a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Declaration kind the model has no counterpart for
    UnsupportedDeclaration,
    /// Enum case text after the name has an unknown shape
    MalformedEnumCaseBody,
    /// Enum case text could not be located in the source
    UnresolvableEnumCaseBody,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnsupportedDeclaration => write!(f, "unsupported-declaration"),
            DiagnosticKind::MalformedEnumCaseBody => write!(f, "malformed-enum-case-body"),
            DiagnosticKind::UnresolvableEnumCaseBody => write!(f, "unresolvable-enum-case-body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Byte offset of the declaration, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    pub message: String,
}

/// Diagnostic sink threaded through every parsing step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    verbose: bool,
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            records: Vec::new(),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Record a diagnostic; a no-op unless verbose
    pub fn report(&mut self, kind: DiagnosticKind, offset: Option<usize>, message: String) {
        if !self.verbose {
            return;
        }
        tracing::debug!(%kind, ?offset, "{}", message);
        self.records.push(Diagnostic {
            kind,
            offset,
            message,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append another sink's records
    pub fn extend(&mut self, other: Diagnostics) {
        self.records.extend(other.records);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}

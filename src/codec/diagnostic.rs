//! Diagnostic types for GEDCOM parsing and reference resolution.
//!
//! Nothing in here is fatal. Diagnostics are collected while the pipeline runs and handed back
//! next to the successfully resolved persons, so a caller can report a partial success.

use crate::properties::RecordKind;
use serde::Serialize;

/// A pointer (FAMC, FAMS, HUSB, WIFE, CHIL) whose target is not in the index.
///
/// # Examples
///
/// ```
/// # use lineage_core::{codec::UnresolvedReference, properties::RecordKind};
/// // `1 CHIL @I9@` inside `0 @F1@ FAM`, where no `@I9@` individual exists:
/// let unresolved = UnresolvedReference::new("@F1@", "CHIL", "@I9@", RecordKind::Individual)
///     .with_location(12);
/// assert_eq!(unresolved.target, "@I9@");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// Id of the record holding the pointer
    pub owner: String,

    /// Pointer tag, e.g. `FAMC`
    pub tag: String,

    /// The id that could not be found
    pub target: String,

    /// What kind of record the pointer should lead to
    pub expected: RecordKind,

    /// Source line of the pointer, if known
    pub line_number: Option<usize>,
}

impl UnresolvedReference {
    pub fn new(
        owner: impl Into<String>,
        tag: impl Into<String>,
        target: impl Into<String>,
        expected: RecordKind,
    ) -> Self {
        Self {
            owner: owner.into(),
            tag: tag.into(),
            target: target.into(),
            expected,
            line_number: None,
        }
    }

    pub fn with_location(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }
}

/// Non-fatal inconsistency found while parsing, indexing or resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseDiagnostic {
    /// A pointer to a record that is not in the index
    UnresolvedReference(UnresolvedReference),

    /// An INDI or FAM record without an `@...@` id. The record is left out of the index.
    MissingXref { tag: String, line_number: usize },

    /// A second record claiming an id already taken. The first one wins.
    DuplicateXref {
        id: String,
        kind: RecordKind,
        line_number: usize,
    },

    /// A line more than one level deeper than its predecessor, re-attached one level down
    LevelJump {
        line_number: usize,
        declared: usize,
        effective: usize,
    },

    /// A warning message about the data (e.g. unsupported SEX value)
    Warning(String),

    /// An informational message about the parse
    Info(String),
}

impl ParseDiagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Info(message.into())
    }

    pub fn is_unresolved_reference(&self) -> bool {
        matches!(self, Self::UnresolvedReference(_))
    }

    pub fn as_unresolved_reference(&self) -> Option<&UnresolvedReference> {
        match self {
            Self::UnresolvedReference(unresolved) => Some(unresolved),
            _ => None,
        }
    }

    /// Everything except `Info` counts towards the inconsistency total.
    pub fn is_inconsistency(&self) -> bool {
        !matches!(self, Self::Info(_))
    }
}

impl From<UnresolvedReference> for ParseDiagnostic {
    fn from(unresolved: UnresolvedReference) -> Self {
        ParseDiagnostic::UnresolvedReference(unresolved)
    }
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvedReference(unresolved) => {
                write!(
                    f,
                    "Unresolved reference: {} {} -> {} (no such {})",
                    unresolved.owner, unresolved.tag, unresolved.target, unresolved.expected
                )?;
                if let Some(line) = unresolved.line_number {
                    write!(f, " at line {line}")?;
                }
                Ok(())
            }
            Self::MissingXref { tag, line_number } => {
                write!(f, "{tag} record at line {line_number} has no xref id; skipped")
            }
            Self::DuplicateXref {
                id,
                kind,
                line_number,
            } => write!(
                f,
                "Duplicate {kind} ({}) id {id} at line {line_number}; keeping the first",
                kind.tag()
            ),
            Self::LevelJump {
                line_number,
                declared,
                effective,
            } => write!(
                f,
                "Level jump at line {line_number}: declared {declared}, treated as {effective}"
            ),
            Self::Warning(msg) => write!(f, "Warning: {msg}"),
            Self::Info(msg) => write!(f, "Info: {msg}"),
        }
    }
}

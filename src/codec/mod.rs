//! GEDCOM text in, person documents out.
//!
//! ## Key Components
//!
//! - [`line`] - Splits raw text into `(level, xref, tag, payload)` lines
//! - [`tree`] - Rebuilds the level hierarchy into nested [`Record`]s
//! - [`md`] - Renders a [`ResolvedPerson`](crate::resolve::ResolvedPerson) as a markdown note
//!   with YAML front-matter
//! - [`GedcomCompiler`] - Runs the whole pipeline for one file and writes the documents
//! - [`ParseDiagnostic`] - Tracks malformed structure and unresolved references
//!
//! ## Pipeline
//!
//! 1. **Tokenize**: every physical line becomes a [`Line`] or is dropped
//! 2. **Build**: lines are nested into root [`Record`]s (HEAD, INDI, FAM, TRLR, ...)
//! 3. **Index**: INDI/FAM roots are extracted into a [`RecordIndex`](crate::index::RecordIndex)
//! 4. **Resolve**: parents, spouses and children are looked up through the index
//! 5. **Serialize**: each resolved person becomes one document
//!
//! Resolution only starts once the whole file is indexed, since pointers to records defined
//! later in the file are normal.
//!
//! ```rust
//! use lineage_core::{codec::parse_document, index::RecordIndex, resolve::Resolver};
//!
//! let text = "0 @I1@ INDI\n1 NAME John /Smith/\n1 FAMS @F1@\n\
//!             0 @I2@ INDI\n1 NAME Jane /Doe/\n1 FAMS @F1@\n\
//!             0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n";
//! let document = parse_document(text);
//! let index = RecordIndex::build(&document.records);
//! let resolution = Resolver::new(&index).resolve_all();
//! let john = resolution.person("@I1@").unwrap();
//! assert!(john.spouses.contains("@I2@"));
//! ```

pub mod compiler;
pub mod diagnostic;
pub mod line;
pub mod md;
pub mod tree;

pub use compiler::{Compilation, ExportReport, ExportStats, GedcomCompiler, SourceText};
pub use diagnostic::{ParseDiagnostic, UnresolvedReference};
pub use line::{tokenize, tokenize_line, Line};
pub use tree::{build_records, Record};

/// A parsed GEDCOM file before indexing.
#[derive(Debug, Clone, Default)]
pub struct GedcomDocument {
    pub records: Vec<Record>,
    pub diagnostics: Vec<ParseDiagnostic>,
    /// Physical lines in the input
    pub lines_read: usize,
    /// Lines dropped by the tokenizer (blank or malformed)
    pub lines_dropped: usize,
}

/// Tokenize and build the record tree for a whole text.
pub fn parse_document(text: &str) -> GedcomDocument {
    let lines: Vec<Line> = tokenize(text).collect();
    let lines_read = text.lines().count();
    let lines_dropped = lines_read - lines.len();
    let (records, diagnostics) = build_records(lines);

    tracing::debug!(
        "[parse_document] {} lines read, {} dropped, {} root records",
        lines_read,
        lines_dropped,
        records.len()
    );

    GedcomDocument {
        records,
        diagnostics,
        lines_read,
        lines_dropped,
    }
}

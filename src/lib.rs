//! # lineage-core
//!
//! A Rust library for turning GEDCOM genealogy files into one markdown note per person.
//!
//! ## Overview
//!
//! lineage-core reads the line-oriented GEDCOM format, rebuilds its record tree, indexes
//! individuals and families by cross-reference id, and resolves who is whose parent, spouse
//! and child. Each resolved person is rendered as a markdown document with YAML front-matter
//! that note-taking tools can query.
//!
//! ### Key Features
//!
//! - **Tolerant parsing**: malformed lines are dropped, over-deep lines are re-attached, and the
//!   parse never aborts on bad data
//! - **Forward references**: the whole file is indexed before anything is resolved
//! - **Diagnostics, not errors**: dangling pointers, duplicate ids and odd values are reported as
//!   [`codec::ParseDiagnostic`]s next to the output
//! - **Deterministic output**: persons, parents and spouses are ordered by id, so re-running an
//!   export on the same input leaves every document untouched
//!
//! ## Architecture
//!
//! - **[`codec`]**: tokenizer, record tree, markdown rendering and the [`codec::GedcomCompiler`]
//!   pipeline
//! - **[`index`]**: [`index::RecordIndex`], the id to record lookup built from the tree
//! - **[`resolve`]**: [`resolve::Resolver`], relationship lookups through the index
//! - **[`properties`]**: individual, family and event records
//! - **[`config`]**: [`config::ExportConfig`], TOML-backed export settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lineage_core::{codec::GedcomCompiler, config::ExportConfig};
//!
//! fn main() -> Result<(), lineage_core::LineageError> {
//!     let config = ExportConfig::default().with_output_dir("vault/people");
//!     let compiler = GedcomCompiler::new(config);
//!
//!     let report = compiler.export_file("family.ged")?;
//!     println!("{report}");
//!     for diagnostic in &report.diagnostics {
//!         println!("  {diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Working with Diagnostics
//!
//! ```rust
//! use lineage_core::codec::{GedcomCompiler, ParseDiagnostic};
//!
//! let text = "0 @I1@ INDI\n1 NAME Ann /Lee/\n1 FAMC @F9@\n";
//! let compilation = GedcomCompiler::default().compile_str(text);
//!
//! for diagnostic in compilation.diagnostics() {
//!     if let ParseDiagnostic::UnresolvedReference(unresolved) = diagnostic {
//!         assert_eq!(unresolved.target, "@F9@");
//!     }
//! }
//! assert!(compilation.resolution.person("@I1@").unwrap().parents.is_empty());
//! ```
//!
//! ## Features
//!
//! - **default**: the library
//! - **bin**: the `lineage` command-line tool (`clap`, `tracing-subscriber`)

pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod properties;
pub mod resolve;
#[cfg(test)]
mod tests;

pub use error::*;

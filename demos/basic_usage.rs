//! Basic usage example for lineage
//!
//! This example demonstrates:
//! - Writing a small GEDCOM file
//! - Exporting it to one markdown note per person
//! - Inspecting relationships and diagnostics
//!
//! Run with: cargo run --example basic_usage

use lineage_core::{
    codec::{GedcomCompiler, ParseDiagnostic},
    config::ExportConfig,
    LineageError,
};
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = "0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Ada /Byron/
1 SEX F
1 BIRT
2 DATE 10 DEC 1815
2 PLAC London
1 FAMS @F1@
0 @I2@ INDI
1 NAME William /King/
1 SEX M
1 FAMS @F1@
0 @I3@ INDI
1 NAME Byron /King/
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I2@
1 WIFE @I1@
1 CHIL @I3@
1 CHIL @I4@
0 TRLR
";

fn main() -> Result<(), LineageError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== lineage Basic Usage Example ===\n");

    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("lovelace.ged");
    fs::write(&source, SAMPLE)?;

    println!("1. Exporting {source:?}...");
    let compiler = GedcomCompiler::new(
        ExportConfig::default().with_output_dir(temp_dir.path().join("people")),
    );
    let report = compiler.export_file(&source)?;
    println!("   ✓ {report}\n");

    println!("2. Written documents:");
    for path in &report.written {
        println!("   - {}", path.display());
    }

    println!("\n3. Ada's note:\n");
    let ada = fs::read_to_string(temp_dir.path().join("people").join("I1.md"))?;
    for line in ada.lines() {
        println!("   {line}");
    }

    println!("\n4. Relationships:");
    let compilation = compiler.compile_file(&source)?;
    for person in &compilation.resolution.persons {
        println!(
            "   {} ({}): parents {:?}, spouses {:?}, children {:?}",
            person.display_name(),
            person.id(),
            person.parents,
            person.spouses,
            person.children
        );
    }

    println!("\n5. Diagnostics:");
    for diagnostic in &report.diagnostics {
        match diagnostic {
            ParseDiagnostic::UnresolvedReference(unresolved) => {
                println!("   dangling pointer to {}", unresolved.target);
            }
            other => println!("   {other}"),
        }
    }

    Ok(())
}

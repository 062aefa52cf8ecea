//! lineage CLI tool
//!
//! Command-line interface for exporting GEDCOM files with lineage-core.
//!
//! ## Commands
//!
//! - `export <path>`: Write one document per person, then print a summary
//! - `inspect <file>`: Show how a file tokenizes or nests, plus its diagnostics
//! - `show <file> <id>`: Print the rendered document of a single person
//!
//! Diagnostics never change the exit status. Only I/O and configuration failures do.

use clap::{Parser, Subcommand};
use lineage_core::{
    codec::{tokenize, GedcomCompiler, ParseDiagnostic, Record},
    config::{ExportConfig, OutputFormat, OUTPUT_DIR_ENV},
    LineageError,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(author, version, about = "Export GEDCOM genealogy files as markdown notes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a GEDCOM file, or every .ged file in a directory
    Export {
        /// GEDCOM file or directory
        path: PathBuf,

        /// Output directory (overrides the config file)
        #[arg(short, long, env = OUTPUT_DIR_ENV)]
        out: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: markdown or json
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Keep existing documents whose content differs
        #[arg(long)]
        no_overwrite: bool,

        /// Print every diagnostic
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the tokenized lines or the record tree of a file, with diagnostics
    Inspect {
        /// GEDCOM file
        file: PathBuf,

        /// Show the nested record tree instead of the flat line list
        #[arg(long)]
        tree: bool,
    },

    /// Print the rendered document for one person
    Show {
        /// GEDCOM file
        file: PathBuf,

        /// Individual id, with or without the surrounding `@`
        id: String,

        /// Output format: markdown or json
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run(command: Commands) -> Result<(), LineageError> {
    match command {
        Commands::Export {
            path,
            out,
            config,
            format,
            no_overwrite,
            verbose,
        } => {
            let mut export_config = match config {
                Some(config_path) => ExportConfig::load(config_path)?,
                None => ExportConfig::default(),
            };
            if let Some(out) = out {
                export_config = export_config.with_output_dir(out);
            }
            if let Some(format) = format {
                export_config = export_config.with_format(format);
            }
            if no_overwrite {
                export_config = export_config.with_overwrite(false);
            }

            let compiler = GedcomCompiler::new(export_config);
            let reports = compiler.export_path(&path)?;

            if reports.is_empty() {
                println!("No GEDCOM files found in {}", path.display());
            } else if verbose {
                println!(
                    "Writing {:?} documents below {}",
                    compiler.config().format,
                    compiler.config().output_dir.display()
                );
            }
            for report in reports {
                println!("{}: {}", report.source.display(), report);
                if !report.skipped.is_empty() {
                    println!(
                        "  {} documents differ and were kept (overwrite disabled)",
                        report.skipped.len()
                    );
                }
                if verbose {
                    println!(
                        "  {} lines read, {} dropped, {} families",
                        report.stats.lines_read, report.stats.lines_dropped, report.stats.families
                    );
                    print_diagnostics(&report.diagnostics);
                }
            }
        }

        Commands::Inspect { file, tree } => {
            let compiler = GedcomCompiler::default();
            let source = compiler.read_source(&file)?;
            let compilation = compiler.compile_source(&source);
            if tree {
                for record in &compilation.document.records {
                    print_record(record);
                }
            } else {
                for line in tokenize(&source.text) {
                    println!(
                        "{:>5}: {} {} {} {}",
                        line.line_number,
                        line.level,
                        line.xref_id.as_deref().unwrap_or("-"),
                        line.tag,
                        line.payload
                    );
                }
            }
            println!(
                "{} lines read, {} dropped, {} individuals, {} families",
                compilation.document.lines_read,
                compilation.document.lines_dropped,
                compilation.index.individual_count(),
                compilation.index.family_count()
            );
            let diagnostics: Vec<ParseDiagnostic> = compilation.diagnostics().cloned().collect();
            print_diagnostics(&diagnostics);
        }

        Commands::Show { file, id, format } => {
            let mut config = ExportConfig::default();
            if let Some(format) = format {
                config = config.with_format(format);
            }
            let compiler = GedcomCompiler::new(config);
            let compilation = compiler.compile_file(&file)?;
            let id = if id.starts_with('@') {
                id
            } else {
                format!("@{id}@")
            };
            let person = compilation.resolution.person(&id).ok_or_else(|| {
                LineageError::NotFound(format!("no individual {id} in {}", file.display()))
            })?;
            print!("{}", compiler.render(person)?);
        }
    }

    Ok(())
}

fn print_record(record: &Record) {
    for (position, (depth, tag, value)) in record.flatten().into_iter().enumerate() {
        let indent = "  ".repeat(depth);
        let xref = match (position, &record.xref_id) {
            (0, Some(xref)) => format!("{xref} "),
            _ => String::new(),
        };
        if value.is_empty() {
            println!("{indent}{xref}{tag}");
        } else {
            println!("{indent}{xref}{tag} {value}");
        }
    }
}

fn print_diagnostics(diagnostics: &[ParseDiagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("Diagnostics ({}):", diagnostics.len());
    for diagnostic in diagnostics {
        println!("  {diagnostic}");
    }
}

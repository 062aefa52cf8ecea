use crate::{
    codec::{
        md::{document_file_name, person_to_json, person_to_markdown},
        parse_document, GedcomDocument, ParseDiagnostic,
    },
    config::{ExportConfig, OutputFormat},
    error::LineageError,
    index::RecordIndex,
    resolve::{Resolution, ResolvedPerson, Resolver},
};
use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    fs,
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

const GEDCOM_EXTENSION: &str = "ged";

/// Runs the GEDCOM pipeline for whole files and writes one document per person.
///
/// ## Overview
///
/// For each input file the compiler:
///
/// 1. Reads the full text (the only step that can fail fatally, besides writing)
/// 2. Tokenizes and builds the record tree
/// 3. Indexes INDI and FAM records
/// 4. Resolves parents, spouses and children for every individual
/// 5. Renders and writes the documents into the configured output directory
///
/// A file is processed in one pass, start to finish; resolution never starts before the index
/// is complete, so forward references between records always resolve.
///
/// ## Write-Back
///
/// Documents whose content is already on disk are not rewritten. When
/// [`ExportConfig::overwrite`] is false, differing documents are left alone and listed in
/// [`ExportReport::skipped`]. Writes go through a temporary file and a rename so a failed run
/// never leaves a half-written document behind.
///
/// ## Directories
///
/// [`GedcomCompiler::export_path`] accepts a directory as well: each `*.ged` file below it is
/// exported on its own into `<output_dir>/<relative path without extension>/`, so
/// `a/tree.ged` lands in `<output_dir>/a/tree/`. Files never share records or folders.
#[derive(Debug, Clone, Default)]
pub struct GedcomCompiler {
    config: ExportConfig,
}

/// Decoded file text plus what decoding had to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    pub text: String,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Everything one file produced, before anything is written.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub document: GedcomDocument,
    pub index: RecordIndex,
    pub resolution: Resolution,
}

impl Compilation {
    /// Tree-building diagnostics followed by index and resolution diagnostics.
    pub fn diagnostics(&self) -> impl Iterator<Item = &ParseDiagnostic> {
        self.document
            .diagnostics
            .iter()
            .chain(self.resolution.diagnostics.iter())
    }

    pub fn stats(&self) -> ExportStats {
        ExportStats {
            persons: self.resolution.persons.len(),
            families: self.index.family_count(),
            lines_read: self.document.lines_read,
            lines_dropped: self.document.lines_dropped,
        }
    }
}

/// Counts for one exported file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub persons: usize,
    pub families: usize,
    pub lines_read: usize,
    pub lines_dropped: usize,
}

/// Result of exporting a single GEDCOM file
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    /// Documents created or replaced
    pub written: Vec<PathBuf>,
    /// Documents already up to date
    pub unchanged: Vec<PathBuf>,
    /// Documents that differ but were kept because overwriting is disabled
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub stats: ExportStats,
}

impl ExportReport {
    /// Persons whose document is on disk and current after this run.
    pub fn exported_count(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }

    pub fn inconsistency_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.is_inconsistency())
            .count()
    }
}

impl Display for ExportReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} persons exported, {} inconsistencies",
            self.exported_count(),
            self.inconsistency_count()
        )
    }
}

impl GedcomCompiler {
    pub fn new(config: ExportConfig) -> Self {
        GedcomCompiler { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Parse, index and resolve an already decoded text. No I/O.
    pub fn compile_str(&self, text: &str) -> Compilation {
        let document = parse_document(text);
        let index = RecordIndex::build(&document.records);
        let resolution = Resolver::new(&index).resolve_all();
        Compilation {
            document,
            index,
            resolution,
        }
    }

    /// Render one person in the configured output format.
    pub fn render(&self, person: &ResolvedPerson) -> Result<String, LineageError> {
        match self.config.format {
            OutputFormat::Markdown => person_to_markdown(person),
            OutputFormat::Json => person_to_json(person),
        }
    }

    /// Read a GEDCOM file into text.
    ///
    /// Invalid UTF-8 is replaced rather than rejected and reported as a warning. Only I/O
    /// failures are errors.
    pub fn read_source(&self, path: impl AsRef<Path>) -> Result<SourceText, LineageError> {
        let path = path.as_ref();
        tracing::debug!("[GedcomCompiler] reading {:?}", path);
        let bytes = fs::read(path)?;
        let mut diagnostics = Vec::new();
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("[GedcomCompiler] {:?} is not valid UTF-8", path);
                diagnostics.push(ParseDiagnostic::warning(format!(
                    "{} is not valid UTF-8; undecodable bytes were replaced",
                    path.display()
                )));
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Ok(SourceText { text, diagnostics })
    }

    /// Compile text returned by [`GedcomCompiler::read_source`], keeping its read diagnostics.
    pub fn compile_source(&self, source: &SourceText) -> Compilation {
        let mut compilation = self.compile_str(&source.text);
        compilation
            .document
            .diagnostics
            .extend(source.diagnostics.iter().cloned());
        compilation
    }

    /// Read a GEDCOM file and compile it.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<Compilation, LineageError> {
        let source = self.read_source(path)?;
        Ok(self.compile_source(&source))
    }

    /// Export one file into the configured output directory.
    pub fn export_file(&self, path: impl AsRef<Path>) -> Result<ExportReport, LineageError> {
        self.export_file_to(path, &self.config.output_dir)
    }

    /// Export one file into `output_dir`, creating it if needed.
    pub fn export_file_to(
        &self,
        path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<ExportReport, LineageError> {
        let source = path.as_ref().to_path_buf();
        let output_dir = output_dir.as_ref().to_path_buf();
        let compilation = self.compile_file(&source)?;
        let mut diagnostics: Vec<ParseDiagnostic> = compilation.diagnostics().cloned().collect();

        fs::create_dir_all(&output_dir)?;

        let mut report = ExportReport {
            source,
            output_dir,
            written: Vec::new(),
            unchanged: Vec::new(),
            skipped: Vec::new(),
            diagnostics: Vec::new(),
            stats: compilation.stats(),
        };

        let extension = self.config.extension();
        let mut claimed_names = HashSet::new();
        for person in &compilation.resolution.persons {
            let file_name = document_file_name(person.id(), extension);
            if !claimed_names.insert(file_name.clone()) {
                tracing::warn!(
                    "[GedcomCompiler] {} maps to already used document name {}",
                    person.id(),
                    file_name
                );
                diagnostics.push(ParseDiagnostic::warning(format!(
                    "{} maps to document name {file_name}, already used by another person; not written",
                    person.id()
                )));
                continue;
            }

            let target = report.output_dir.join(&file_name);
            let content = self.render(person)?;
            match self.write_document(&target, &content)? {
                WriteOutcome::Written => report.written.push(target),
                WriteOutcome::Unchanged => report.unchanged.push(target),
                WriteOutcome::Skipped => report.skipped.push(target),
            }
        }

        report.diagnostics = diagnostics;
        tracing::info!(
            "[GedcomCompiler] {:?}: {} ({} written, {} unchanged, {} skipped)",
            report.source,
            report,
            report.written.len(),
            report.unchanged.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Export a file, or every `*.ged` file below a directory.
    ///
    /// Directory inputs export each file into its own folder named after its path relative to
    /// `path`, without the extension, in lexical path order. When two files would share a
    /// folder (`tree.GED` then `tree.ged`), the later one keeps its extension in the folder
    /// name and gets a `Warning`.
    pub fn export_path(&self, path: impl AsRef<Path>) -> Result<Vec<ExportReport>, LineageError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Ok(vec![self.export_file(path)?]);
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_gedcom_file(entry.path()) {
                sources.push(entry.into_path());
            }
        }
        tracing::debug!(
            "[GedcomCompiler] found {} GEDCOM files below {:?}",
            sources.len(),
            path
        );

        let mut claimed_folders = HashSet::new();
        let mut reports = Vec::with_capacity(sources.len());
        for source in &sources {
            let relative = source.strip_prefix(path).unwrap_or(source.as_path());
            let mut folder = relative.with_extension("");
            let mut reused = None;
            if !claimed_folders.insert(folder.clone()) {
                reused = Some(folder);
                folder = relative.to_path_buf();
                claimed_folders.insert(folder.clone());
            }

            let mut report = self.export_file_to(source, self.config.output_dir.join(&folder))?;
            if let Some(reused) = reused {
                tracing::warn!(
                    "[GedcomCompiler] {:?} would reuse output folder {:?}",
                    source,
                    reused
                );
                report.diagnostics.push(ParseDiagnostic::warning(format!(
                    "output folder {} is already used by another file; exported into {} instead",
                    reused.display(),
                    folder.display()
                )));
            }
            reports.push(report);
        }
        Ok(reports)
    }

    fn write_document(&self, target: &Path, content: &str) -> Result<WriteOutcome, LineageError> {
        match fs::read_to_string(target) {
            Ok(existing) if existing == content => return Ok(WriteOutcome::Unchanged),
            Ok(_) if !self.config.overwrite => return Ok(WriteOutcome::Skipped),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                if !self.config.overwrite {
                    return Ok(WriteOutcome::Skipped);
                }
            }
            Err(err) => return Err(err.into()),
        }

        let mut tmp_name = target.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        fs::write(&tmp, content)?;
        fs::rename(&tmp, target)?;
        Ok(WriteOutcome::Written)
    }
}

enum WriteOutcome {
    Written,
    Unchanged,
    Skipped,
}

fn is_gedcom_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(GEDCOM_EXTENSION))
        .unwrap_or(false)
}

//! Export pipeline tests: fixture files in, documents on disk out

use lineage_core::{
    codec::{GedcomCompiler, ParseDiagnostic},
    config::{ExportConfig, OutputFormat},
    LineageError,
};
use std::fs;
use test_log::test;

use super::common::{fixture, generate_test_root, outline};

fn front_matter(doc: &str) -> serde_yaml::Value {
    let metadata = outline(doc).metadata.expect("document has a metadata block");
    serde_yaml::from_str(&metadata).expect("metadata block is YAML")
}

fn string_list(value: &serde_yaml::Value) -> Vec<String> {
    value
        .as_sequence()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_export_family_fixture() -> Result<(), Box<dyn std::error::Error>> {
    let (test_tempdir, source) = generate_test_root("family.ged")?;
    let out = test_tempdir.path().join("people");
    let compiler = GedcomCompiler::new(ExportConfig::default().with_output_dir(&out));

    let report = compiler.export_file(&source)?;
    tracing::info!("{report}");

    assert_eq!(report.written.len(), 7);
    assert!(report.unchanged.is_empty());
    assert_eq!(report.stats.persons, 7);
    assert_eq!(report.stats.families, 3);
    assert_eq!(report.stats.lines_read, 62);
    assert_eq!(report.stats.lines_dropped, 2);
    assert_eq!(report.to_string(), "7 persons exported, 4 inconsistencies");

    let mut names: Vec<String> = fs::read_dir(&out)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(
        names,
        vec!["I1.md", "I2.md", "I3.md", "I4.md", "I5.md", "I6.md", "I7.md"]
    );

    let john = fs::read_to_string(out.join("I1.md"))?;
    let john_outline = outline(&john);
    assert_eq!(john_outline.h1, vec!["John Smith"]);
    assert_eq!(
        john_outline.paragraphs,
        vec!["Born: 12 MAR 1890 in Boston, Massachusetts\nDied: 1961"]
    );
    let meta = front_matter(&john);
    assert_eq!(meta["id"].as_str(), Some("@I1@"));
    assert_eq!(meta["sex"].as_str(), Some("M"));
    assert_eq!(meta["deathDate"].as_str(), Some("1961"));
    assert_eq!(string_list(&meta["spouses"]), vec!["@I2@", "@I4@"]);
    assert_eq!(string_list(&meta["children"]), vec!["@I3@", "@I5@"]);
    assert!(meta.get("parents").is_none());

    // Adopted: two child-of families, four parents
    let jim = fs::read_to_string(out.join("I3.md"))?;
    assert_eq!(
        string_list(&front_matter(&jim)["parents"]),
        vec!["@I1@", "@I2@", "@I6@", "@I7@"]
    );

    let jane = fs::read_to_string(out.join("I2.md"))?;
    assert!(jane.contains("\n**Born:**  in Dublin\n"));
    assert!(front_matter(&jane).get("birthDate").is_none());

    Ok(())
}

#[test]
fn test_export_reports_inconsistencies() -> Result<(), Box<dyn std::error::Error>> {
    let (test_tempdir, source) = generate_test_root("family.ged")?;
    let compiler = GedcomCompiler::new(
        ExportConfig::default().with_output_dir(test_tempdir.path().join("out")),
    );
    let report = compiler.export_file(&source)?;

    let unresolved: Vec<(String, usize)> = report
        .diagnostics
        .iter()
        .filter_map(ParseDiagnostic::as_unresolved_reference)
        .map(|u| (u.target.clone(), u.line_number.unwrap_or_default()))
        .collect();
    assert_eq!(
        unresolved,
        vec![("@F9@".to_string(), 36), ("@I8@".to_string(), 55)]
    );
    assert!(report.diagnostics.contains(&ParseDiagnostic::LevelJump {
        line_number: 49,
        declared: 3,
        effective: 2,
    }));
    assert!(report.diagnostics.contains(&ParseDiagnostic::MissingXref {
        tag: "INDI".to_string(),
        line_number: 60,
    }));
    Ok(())
}

#[test]
fn test_reexport_leaves_documents_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let (test_tempdir, source) = generate_test_root("family.ged")?;
    let compiler = GedcomCompiler::new(
        ExportConfig::default().with_output_dir(test_tempdir.path().join("out")),
    );

    let first = compiler.export_file(&source)?;
    let before = fs::read_to_string(&first.written[0])?;

    let second = compiler.export_file(&source)?;
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), 7);
    assert_eq!(second.exported_count(), 7);
    assert_eq!(fs::read_to_string(&second.unchanged[0])?, before);
    Ok(())
}

#[test]
fn test_no_overwrite_keeps_edited_documents() -> Result<(), Box<dyn std::error::Error>> {
    let (test_tempdir, source) = generate_test_root("family.ged")?;
    let out = test_tempdir.path().join("out");
    GedcomCompiler::new(ExportConfig::default().with_output_dir(&out)).export_file(&source)?;

    let edited = out.join("I4.md");
    fs::write(&edited, "# my own notes\n")?;

    let keep = GedcomCompiler::new(
        ExportConfig::default()
            .with_output_dir(&out)
            .with_overwrite(false),
    );
    let report = keep.export_file(&source)?;
    assert_eq!(report.skipped, vec![edited.clone()]);
    assert_eq!(report.unchanged.len(), 6);
    assert_eq!(fs::read_to_string(&edited)?, "# my own notes\n");

    let replace = GedcomCompiler::new(ExportConfig::default().with_output_dir(&out));
    let report = replace.export_file(&source)?;
    assert_eq!(report.written, vec![edited.clone()]);
    assert!(fs::read_to_string(&edited)?.contains("# Mary Jones"));
    Ok(())
}

#[test]
fn test_export_json_format() -> Result<(), Box<dyn std::error::Error>> {
    let (test_tempdir, source) = generate_test_root("family.ged")?;
    let out = test_tempdir.path().join("json");
    let compiler = GedcomCompiler::new(
        ExportConfig::default()
            .with_output_dir(&out)
            .with_format(OutputFormat::Json),
    );
    let report = compiler.export_file(&source)?;
    assert_eq!(report.written.len(), 7);

    let tom: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("I5.json"))?)?;
    assert_eq!(tom["id"], "@I5@");
    assert_eq!(tom["parents"], serde_json::json!(["@I1@", "@I4@"]));
    assert_eq!(tom["spouse_in_family_ids"], serde_json::json!(["@F9@"]));
    Ok(())
}

#[test]
fn test_export_directory() -> Result<(), Box<dyn std::error::Error>> {
    let (test_tempdir, batch) = generate_test_root("batch")?;
    let out = test_tempdir.path().join("out");
    let compiler = GedcomCompiler::new(ExportConfig::default().with_output_dir(&out));

    let reports = compiler.export_path(&batch)?;
    assert_eq!(reports.len(), 2);
    assert!(reports[0].source.ends_with("bakers.ged"));
    assert!(reports[1].source.ends_with("weber.ged"));

    // CRLF line endings
    let bob = fs::read_to_string(out.join("bakers").join("P2.md"))?;
    assert_eq!(string_list(&front_matter(&bob)["spouses"]), vec!["@P1@"]);
    assert_eq!(outline(&bob).h1, vec!["Bob Baker"]);

    // Leading byte order mark
    let carl = fs::read_to_string(out.join("weber").join("A1.md"))?;
    assert!(carl.contains("**Born:** 1801 in Berlin"));
    assert_eq!(reports[1].inconsistency_count(), 0);
    Ok(())
}

#[test]
fn test_missing_source_is_fatal() {
    let compiler = GedcomCompiler::default();
    let err = compiler
        .export_file(fixture("does-not-exist.ged"))
        .unwrap_err();
    assert!(matches!(err, LineageError::NotFound(_)));
}

#[test]
fn test_non_utf8_input_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let test_tempdir = tempfile::tempdir()?;
    let source = test_tempdir.path().join("latin1.ged");
    fs::write(&source, b"0 @I1@ INDI\n1 NAME Ren\xe9 /Dupont/\n")?;

    let compilation = GedcomCompiler::default().compile_file(&source)?;
    let rene = compilation.resolution.person("@I1@").expect("indexed");
    assert_eq!(rene.individual.surname.as_deref(), Some("Dupont"));
    assert!(compilation
        .diagnostics()
        .any(|d| matches!(d, ParseDiagnostic::Warning(msg) if msg.contains("UTF-8"))));
    Ok(())
}

#[test]
fn test_read_source_replaces_invalid_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let test_tempdir = tempfile::tempdir()?;
    let source = test_tempdir.path().join("latin1.ged");
    fs::write(&source, b"0 @I1@ INDI\n1 NAME Ren\xe9 /Dupont/\n")?;

    let compiler = GedcomCompiler::default();
    let text = compiler.read_source(&source)?;
    assert!(text.text.contains("Ren\u{fffd} /Dupont/"));
    assert_eq!(text.diagnostics.len(), 1);

    let compilation = compiler.compile_source(&text);
    assert_eq!(compilation.index.individual_count(), 1);
    assert!(compilation.diagnostics().any(|d| d == &text.diagnostics[0]));
    Ok(())
}

#[test]
fn test_colliding_document_names_keep_the_first() -> Result<(), Box<dyn std::error::Error>> {
    let test_tempdir = tempfile::tempdir()?;
    let source = test_tempdir.path().join("slashes.ged");
    fs::write(
        &source,
        "0 @A/B@ INDI\n1 NAME First /One/\n0 @A\\B@ INDI\n1 NAME Second /Two/\n",
    )?;
    let out = test_tempdir.path().join("out");
    let compiler = GedcomCompiler::new(ExportConfig::default().with_output_dir(&out));

    let report = compiler.export_file(&source)?;
    assert_eq!(report.stats.persons, 2);
    assert_eq!(report.written, vec![out.join("A_B.md")]);
    assert_eq!(fs::read_dir(&out)?.count(), 1);

    let kept = fs::read_to_string(out.join("A_B.md"))?;
    assert_eq!(front_matter(&kept)["id"].as_str(), Some("@A/B@"));
    assert!(report.diagnostics.iter().any(|d| matches!(
        d,
        ParseDiagnostic::Warning(msg) if msg.contains("@A\\B@") && msg.contains("A_B.md")
    )));
    assert_eq!(report.to_string(), "1 persons exported, 1 inconsistencies");
    Ok(())
}

#[test]
fn test_directory_export_keeps_same_named_files_apart() -> Result<(), Box<dyn std::error::Error>> {
    let test_tempdir = tempfile::tempdir()?;
    let input = test_tempdir.path().join("in");
    fs::create_dir_all(input.join("a"))?;
    fs::create_dir_all(input.join("b"))?;
    fs::write(input.join("a/tree.ged"), "0 @I1@ INDI\n1 NAME Alice /A/\n")?;
    fs::write(input.join("b/tree.ged"), "0 @I1@ INDI\n1 NAME Bob /B/\n")?;
    let out = test_tempdir.path().join("out");
    let compiler = GedcomCompiler::new(ExportConfig::default().with_output_dir(&out));

    let reports = compiler.export_path(&input)?;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].output_dir, out.join("a").join("tree"));
    assert_eq!(reports[1].output_dir, out.join("b").join("tree"));
    assert!(reports.iter().all(|r| r.written.len() == 1));
    assert!(reports.iter().all(|r| r.inconsistency_count() == 0));

    let alice = fs::read_to_string(out.join("a/tree/I1.md"))?;
    let bob = fs::read_to_string(out.join("b/tree/I1.md"))?;
    assert_eq!(outline(&alice).h1, vec!["Alice A"]);
    assert_eq!(outline(&bob).h1, vec!["Bob B"]);
    Ok(())
}

#[test]
fn test_directory_export_reports_reused_folder() -> Result<(), Box<dyn std::error::Error>> {
    let test_tempdir = tempfile::tempdir()?;
    let input = test_tempdir.path().join("in");
    fs::create_dir_all(&input)?;
    fs::write(input.join("tree.GED"), "0 @I1@ INDI\n1 NAME Upper /Case/\n")?;
    fs::write(input.join("tree.ged"), "0 @I1@ INDI\n1 NAME Lower /Case/\n")?;
    // Case-insensitive file systems hold only one of the two
    if fs::read_dir(&input)?.count() < 2 {
        return Ok(());
    }
    let out = test_tempdir.path().join("out");
    let compiler = GedcomCompiler::new(ExportConfig::default().with_output_dir(&out));

    let reports = compiler.export_path(&input)?;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].output_dir, out.join("tree"));
    assert_eq!(reports[1].output_dir, out.join("tree.ged"));
    assert!(reports[0].diagnostics.is_empty());
    assert!(reports[1].diagnostics.iter().any(|d| matches!(
        d,
        ParseDiagnostic::Warning(msg) if msg.contains("already used")
    )));

    let upper = fs::read_to_string(out.join("tree/I1.md"))?;
    let lower = fs::read_to_string(out.join("tree.ged/I1.md"))?;
    assert_eq!(outline(&upper).h1, vec!["Upper Case"]);
    assert_eq!(outline(&lower).h1, vec!["Lower Case"]);
    Ok(())
}

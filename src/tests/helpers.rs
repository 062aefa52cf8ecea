//! Shared test utilities for resolver and pipeline tests

use crate::{
    codec::parse_document,
    index::RecordIndex,
    resolve::{Resolution, Resolver},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Build an index from GEDCOM lines given without a trailing newline each.
pub fn index_lines(lines: &[&str]) -> RecordIndex {
    init_logging();
    let text = lines.join("\n");
    RecordIndex::build(&parse_document(&text).records)
}

pub fn resolve_lines(lines: &[&str]) -> Resolution {
    Resolver::new(&index_lines(lines)).resolve_all()
}

/// A three generation family with a remarriage:
///
/// - `@I1@` John and `@I2@` Jane are married in `@F1@` with children `@I3@` and `@I4@`
/// - `@I1@` remarries `@I5@` Mary in `@F2@` with child `@I6@`
/// - `@I3@` marries `@I7@` in `@F3@`, child `@I8@`
///
/// Families appear after the individuals that point at them.
pub fn three_generations() -> Vec<&'static str> {
    vec![
        "0 HEAD",
        "1 CHAR UTF-8",
        "0 @I1@ INDI",
        "1 NAME John /Smith/",
        "1 SEX M",
        "1 FAMS @F1@",
        "1 FAMS @F2@",
        "0 @I2@ INDI",
        "1 NAME Jane /Doe/",
        "1 SEX F",
        "1 FAMS @F1@",
        "0 @I3@ INDI",
        "1 NAME Jim /Smith/",
        "1 FAMC @F1@",
        "1 FAMS @F3@",
        "0 @I4@ INDI",
        "1 NAME Ann /Smith/",
        "1 FAMC @F1@",
        "0 @I5@ INDI",
        "1 NAME Mary /Jones/",
        "1 FAMS @F2@",
        "0 @I6@ INDI",
        "1 NAME Tom /Smith/",
        "1 FAMC @F2@",
        "0 @I7@ INDI",
        "1 NAME Sue /Brown/",
        "1 FAMS @F3@",
        "0 @I8@ INDI",
        "1 NAME Max /Smith/",
        "1 FAMC @F3@",
        "0 @F1@ FAM",
        "1 HUSB @I1@",
        "1 WIFE @I2@",
        "1 CHIL @I3@",
        "1 CHIL @I4@",
        "0 @F2@ FAM",
        "1 HUSB @I1@",
        "1 WIFE @I5@",
        "1 CHIL @I6@",
        "0 @F3@ FAM",
        "1 HUSB @I3@",
        "1 WIFE @I7@",
        "1 CHIL @I8@",
        "0 TRLR",
    ]
}

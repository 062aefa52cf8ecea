//! Markdown rendering of resolved persons.
//!
//! A document is a YAML metadata block followed by a body:
//!
//! ```text
//! ---
//! id: '@I1@'
//! name: John Smith
//! givenName: John
//! surname: Smith
//! sex: M
//! birthPlace: Boston
//! spouses:
//! - '@I2@'
//! ---
//!
//! # John Smith
//!
//! **Born:**  in Boston
//! ```
//!
//! Front-matter keys always appear in the same order and keys without a value are left out.

use serde::Serialize;
use std::fmt::Write;

use crate::{error::LineageError, properties::Sex, resolve::ResolvedPerson};

const FRONTMATTER_DELIMITER: &str = "---";
const BORN_LABEL: &str = "**Born:**";
const DIED_LABEL: &str = "**Died:**";

/// Front-matter fields, in output order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    given_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    surname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_place: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    death_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    death_place: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    spouses: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<&'a str>,
}

impl<'a> FrontMatter<'a> {
    fn from_person(person: &'a ResolvedPerson) -> Self {
        let individual = &person.individual;
        let birth = individual.birth.as_ref();
        let death = individual.death.as_ref();
        FrontMatter {
            id: &individual.id,
            name: individual.name.as_deref(),
            given_name: individual.given_name.as_deref(),
            surname: individual.surname.as_deref(),
            sex: individual.sex,
            birth_date: birth.and_then(|e| e.date.as_deref()),
            birth_place: birth.and_then(|e| e.place.as_deref()),
            death_date: death.and_then(|e| e.date.as_deref()),
            death_place: death.and_then(|e| e.place.as_deref()),
            parents: person.parents.iter().map(String::as_str).collect(),
            spouses: person.spouses.iter().map(String::as_str).collect(),
            children: person.children.iter().map(String::as_str).collect(),
        }
    }
}

/// Render one person as a markdown document. Pure: no I/O.
pub fn person_to_markdown(person: &ResolvedPerson) -> Result<String, LineageError> {
    let yaml = serde_yaml::to_string(&FrontMatter::from_person(person))?;
    let metadata = yaml.strip_prefix("---\n").unwrap_or(&yaml);

    let mut doc = String::new();
    writeln!(doc, "{FRONTMATTER_DELIMITER}")?;
    doc.push_str(metadata);
    if !metadata.ends_with('\n') {
        doc.push('\n');
    }
    writeln!(doc, "{FRONTMATTER_DELIMITER}")?;
    writeln!(doc)?;
    writeln!(doc, "# {}", person.display_name())?;

    let events = [
        (BORN_LABEL, person.individual.birth.as_ref()),
        (DIED_LABEL, person.individual.death.as_ref()),
    ];
    let mut wrote_heading_gap = false;
    for (label, event) in events {
        let Some(event) = event.filter(|e| !e.is_empty()) else {
            continue;
        };
        if !wrote_heading_gap {
            writeln!(doc)?;
            wrote_heading_gap = true;
        }
        writeln!(doc, "{label} {}", event.summary())?;
    }

    Ok(doc)
}

/// Render the structured person record as pretty JSON.
pub fn person_to_json(person: &ResolvedPerson) -> Result<String, LineageError> {
    Ok(serde_json::to_string_pretty(person)?)
}

/// Identifier used for file names: the xref id without `@`. Path separators become `_`, and
/// a name made only of dots (or nothing) has every character replaced by `_`, so the name
/// always stays inside the output directory.
pub fn document_id(id: &str) -> String {
    let stem: String = id
        .chars()
        .filter(|c| *c != '@')
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect();
    if stem.chars().all(|c| c == '.') {
        "_".repeat(stem.len().max(1))
    } else {
        stem
    }
}

pub fn document_file_name(id: &str, extension: &str) -> String {
    let stem = document_id(id);
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}

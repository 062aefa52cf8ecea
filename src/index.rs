//! Flat id → record lookup for INDI and FAM records.
//!
//! The index is the only place cross-references are followed. Individuals and families never
//! point at each other directly; the resolver looks ids up here.

use std::collections::BTreeMap;

/// Root tags that frame a file and are expected to carry no person data.
const FRAMING_TAGS: [&str; 2] = ["HEAD", "TRLR"];

use crate::{
    codec::{tree::Record, ParseDiagnostic, UnresolvedReference},
    properties::{Event, FamilyRecord, IndividualRecord, RecordKind, Sex},
};

#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    individuals: BTreeMap<String, IndividualRecord>,
    families: BTreeMap<String, FamilyRecord>,
    /// Source line for each pointer, keyed by (owner id, tag, target id)
    pointer_lines: BTreeMap<(String, String, String), usize>,
    /// Families naming an individual as HUSB or WIFE, in file order
    partner_families: BTreeMap<String, Vec<String>>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl RecordIndex {
    /// Extract every INDI and FAM root record.
    ///
    /// Records without an xref id are skipped with [`ParseDiagnostic::MissingXref`]. When two
    /// records share an id the first one is kept and the second is reported as
    /// [`ParseDiagnostic::DuplicateXref`]. HEAD and TRLR are skipped silently; any other root
    /// tag (SOUR, NOTE, OBJE, ...) is skipped and counted in one [`ParseDiagnostic::Info`] per
    /// tag.
    pub fn build(roots: &[Record]) -> RecordIndex {
        let mut index = RecordIndex::default();
        let mut ignored: BTreeMap<&str, usize> = BTreeMap::new();
        for record in roots {
            let Some(kind) = RecordKind::from_tag(&record.tag) else {
                if !FRAMING_TAGS.contains(&record.tag.as_str()) {
                    *ignored.entry(record.tag.as_str()).or_default() += 1;
                }
                continue;
            };
            let Some(id) = record.xref_id.clone() else {
                tracing::warn!(
                    "[RecordIndex::build] {} record at line {} has no xref id",
                    record.tag,
                    record.line_number
                );
                index.diagnostics.push(ParseDiagnostic::MissingXref {
                    tag: record.tag.clone(),
                    line_number: record.line_number,
                });
                continue;
            };
            match kind {
                RecordKind::Individual => index.insert_individual(id, record),
                RecordKind::Family => index.insert_family(id, record),
            }
        }
        for (tag, count) in ignored {
            index
                .diagnostics
                .push(ParseDiagnostic::info(format!("ignored {count} {tag} record(s)")));
        }
        tracing::debug!(
            "[RecordIndex::build] indexed {} individuals, {} families",
            index.individuals.len(),
            index.families.len()
        );
        index
    }

    fn insert_individual(&mut self, id: String, record: &Record) {
        if self.individuals.contains_key(&id) {
            self.report_duplicate(id, RecordKind::Individual, record);
            return;
        }
        let individual = self.extract_individual(id.clone(), record);
        self.individuals.insert(id, individual);
    }

    fn insert_family(&mut self, id: String, record: &Record) {
        if self.families.contains_key(&id) {
            self.report_duplicate(id, RecordKind::Family, record);
            return;
        }
        let mut family = FamilyRecord::new(id.clone());
        for child in &record.children {
            let pointer = child.value.as_str();
            if pointer.is_empty() {
                continue;
            }
            let slot = match child.tag.as_str() {
                "HUSB" => Some(&mut family.husband_id),
                "WIFE" => Some(&mut family.wife_id),
                "CHIL" => {
                    family.child_ids.push(pointer.to_string());
                    None
                }
                _ => continue,
            };
            if let Some(slot) = slot {
                if let Some(kept) = slot {
                    tracing::warn!(
                        "[RecordIndex::build] {} has a second {} at line {}",
                        id,
                        child.tag,
                        child.line_number
                    );
                    self.diagnostics.push(ParseDiagnostic::warning(format!(
                        "{id}: extra {} {pointer} at line {} ignored; keeping {kept}",
                        child.tag, child.line_number
                    )));
                    continue;
                }
                *slot = Some(pointer.to_string());
            }
            if child.tag != "CHIL" {
                let listed = self.partner_families.entry(pointer.to_string()).or_default();
                if !listed.contains(&id) {
                    listed.push(id.clone());
                }
            }
            self.pointer_lines.insert(
                (id.clone(), child.tag.clone(), pointer.to_string()),
                child.line_number,
            );
        }
        self.families.insert(id, family);
    }

    fn report_duplicate(&mut self, id: String, kind: RecordKind, record: &Record) {
        tracing::warn!(
            "[RecordIndex::build] duplicate {} id {} at line {}",
            kind,
            id,
            record.line_number
        );
        self.diagnostics.push(ParseDiagnostic::DuplicateXref {
            id,
            kind,
            line_number: record.line_number,
        });
    }

    fn extract_individual(&mut self, id: String, record: &Record) -> IndividualRecord {
        let mut individual = IndividualRecord::new(id.clone());

        if let Some(name) = record.child("NAME") {
            let parsed = PersonalName::parse(&name.value);
            individual.given_name = name
                .child_value("GIVN")
                .map(str::to_string)
                .or(parsed.given);
            individual.surname = name
                .child_value("SURN")
                .map(str::to_string)
                .or(parsed.surname);
            individual.name = parsed.display.or_else(|| {
                let parts: Vec<&str> = [&individual.given_name, &individual.surname]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" "))
            });
        }

        if let Some(sex) = record.child_value("SEX") {
            match sex.parse::<Sex>() {
                Ok(sex) => individual.sex = Some(sex),
                Err(msg) => self
                    .diagnostics
                    .push(ParseDiagnostic::warning(format!("{id}: {msg}"))),
            }
        }

        individual.birth = record.child("BIRT").and_then(extract_event);
        individual.death = record.child("DEAT").and_then(extract_event);

        for child in &record.children {
            let target = match child.tag.as_str() {
                "FAMC" => &mut individual.child_of_family_ids,
                "FAMS" => &mut individual.spouse_in_family_ids,
                _ => continue,
            };
            if child.value.is_empty() || target.contains(&child.value) {
                continue;
            }
            target.push(child.value.clone());
            self.pointer_lines.insert(
                (id.clone(), child.tag.clone(), child.value.clone()),
                child.line_number,
            );
        }

        individual
    }

    /// Check every FAMC/FAMS/HUSB/WIFE/CHIL pointer against the index.
    ///
    /// Individuals are checked first, then families, each in ascending id order.
    pub fn validate_pointers(&self) -> Vec<ParseDiagnostic> {
        let mut diagnostics = Vec::new();

        for individual in self.individuals() {
            let pointers = individual
                .child_of_family_ids
                .iter()
                .map(|f| ("FAMC", f))
                .chain(individual.spouse_in_family_ids.iter().map(|f| ("FAMS", f)));
            for (tag, family_id) in pointers {
                if !self.families.contains_key(family_id) {
                    diagnostics.push(self.unresolved(
                        &individual.id,
                        tag,
                        family_id,
                        RecordKind::Family,
                    ));
                }
            }
        }

        for family in self.families() {
            let pointers = family
                .husband_id
                .iter()
                .map(|i| ("HUSB", i))
                .chain(family.wife_id.iter().map(|i| ("WIFE", i)))
                .chain(family.child_ids.iter().map(|i| ("CHIL", i)));
            for (tag, individual_id) in pointers {
                if !self.individuals.contains_key(individual_id) {
                    diagnostics.push(self.unresolved(
                        &family.id,
                        tag,
                        individual_id,
                        RecordKind::Individual,
                    ));
                }
            }
        }

        for diagnostic in &diagnostics {
            tracing::warn!("[RecordIndex::validate_pointers] {diagnostic}");
        }
        diagnostics
    }

    fn unresolved(
        &self,
        owner: &str,
        tag: &str,
        target: &str,
        expected: RecordKind,
    ) -> ParseDiagnostic {
        let unresolved = UnresolvedReference::new(owner, tag, target, expected);
        let key = (owner.to_string(), tag.to_string(), target.to_string());
        match self.pointer_lines.get(&key) {
            Some(line) => unresolved.with_location(*line).into(),
            None => unresolved.into(),
        }
    }

    pub fn individual(&self, id: &str) -> Option<&IndividualRecord> {
        self.individuals.get(id)
    }

    pub fn family(&self, id: &str) -> Option<&FamilyRecord> {
        self.families.get(id)
    }

    /// Families that list `id` as husband or wife, whether or not the individual carries a
    /// matching FAMS pointer.
    pub fn partner_family_ids(&self, id: &str) -> &[String] {
        self.partner_families
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_individual(&self, id: &str) -> bool {
        self.individuals.contains_key(id)
    }

    /// All individuals in ascending id order.
    pub fn individuals(&self) -> impl Iterator<Item = &IndividualRecord> {
        self.individuals.values()
    }

    /// All families in ascending id order.
    pub fn families(&self) -> impl Iterator<Item = &FamilyRecord> {
        self.families.values()
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Diagnostics raised while building: missing ids, duplicates, unsupported values.
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }
}

fn extract_event(record: &Record) -> Option<Event> {
    let event = Event {
        date: record.child_value("DATE").map(str::to_string),
        place: record.child_value("PLAC").map(str::to_string),
    };
    (!event.is_empty()).then_some(event)
}

/// A NAME value split on the slash surname convention: `Given /Surname/ Suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PersonalName {
    given: Option<String>,
    surname: Option<String>,
    display: Option<String>,
}

impl PersonalName {
    fn parse(value: &str) -> PersonalName {
        let mut parts = value.splitn(3, '/').map(str::trim);
        let given = non_empty(parts.next());
        let surname = non_empty(parts.next());
        let suffix = non_empty(parts.next());

        let display_parts: Vec<&str> = [&given, &surname, &suffix]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        let display = (!display_parts.is_empty()).then(|| display_parts.join(" "));

        PersonalName {
            given,
            surname,
            display,
        }
    }
}

fn non_empty(part: Option<&str>) -> Option<String> {
    part.filter(|p| !p.is_empty()).map(str::to_string)
}

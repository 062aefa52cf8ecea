//! Parent, spouse and child resolution.
//!
//! Every relationship is computed by looking ids up in the [`RecordIndex`]; a
//! [`ResolvedPerson`] holds ids only, never other persons, so the person graph has no
//! ownership cycles. Resolving never mutates the index, so resolving twice gives the same
//! answer.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::{
    codec::ParseDiagnostic,
    index::RecordIndex,
    properties::IndividualRecord,
};

/// An individual joined with its resolved relationships.
///
/// Parents and spouses are sets and iterate in ascending id order. Children keep the order in
/// which they were found: spouse families in FAMS order, then CHIL order within each family.
///
/// Spouse families are the FAMS pointers followed by any family that names the person as HUSB
/// or WIFE without a matching FAMS, so a one-sided link still connects both partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPerson {
    #[serde(flatten)]
    pub individual: IndividualRecord,
    pub parents: BTreeSet<String>,
    pub spouses: BTreeSet<String>,
    pub children: Vec<String>,
}

impl ResolvedPerson {
    pub fn id(&self) -> &str {
        &self.individual.id
    }

    pub fn display_name(&self) -> &str {
        self.individual.display_name()
    }
}

/// All resolved persons of one file plus every inconsistency found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Ascending id order
    pub persons: Vec<ResolvedPerson>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Resolution {
    pub fn person(&self, id: &str) -> Option<&ResolvedPerson> {
        self.persons
            .binary_search_by(|p| p.id().cmp(id))
            .ok()
            .map(|idx| &self.persons[idx])
    }

    pub fn inconsistency_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.is_inconsistency())
            .count()
    }
}

pub struct Resolver<'a> {
    index: &'a RecordIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a RecordIndex) -> Self {
        Resolver { index }
    }

    /// Resolve every indexed individual.
    ///
    /// The returned diagnostics are the index's own (missing ids, duplicates, bad values)
    /// followed by one [`ParseDiagnostic::UnresolvedReference`] per dangling pointer.
    pub fn resolve_all(&self) -> Resolution {
        let persons: Vec<ResolvedPerson> = self
            .index
            .individuals()
            .map(|individual| self.resolve_record(individual))
            .collect();

        let mut diagnostics = self.index.diagnostics().to_vec();
        diagnostics.extend(self.index.validate_pointers());

        tracing::debug!(
            "[Resolver::resolve_all] resolved {} persons with {} diagnostics",
            persons.len(),
            diagnostics.len()
        );

        Resolution {
            persons,
            diagnostics,
        }
    }

    /// Resolve a single individual, `None` if `id` is not indexed.
    pub fn resolve_person(&self, id: &str) -> Option<ResolvedPerson> {
        self.index
            .individual(id)
            .map(|individual| self.resolve_record(individual))
    }

    fn resolve_record(&self, individual: &IndividualRecord) -> ResolvedPerson {
        let id = individual.id.as_str();
        let is_relative = |other: &str| other != id && self.index.contains_individual(other);

        let mut parents = BTreeSet::new();
        for family in individual
            .child_of_family_ids
            .iter()
            .filter_map(|f| self.index.family(f))
        {
            parents.extend(
                family
                    .partners()
                    .filter(|p| is_relative(*p))
                    .map(str::to_string),
            );
        }

        let mut spouse_families: Vec<&str> = Vec::new();
        for family_id in individual
            .spouse_in_family_ids
            .iter()
            .chain(self.index.partner_family_ids(id))
        {
            if !spouse_families.contains(&family_id.as_str()) {
                spouse_families.push(family_id);
            }
        }

        let mut spouses = BTreeSet::new();
        let mut children: Vec<String> = Vec::new();
        for family in spouse_families
            .iter()
            .filter_map(|f| self.index.family(f))
        {
            // A family that does not list this person as HUSB or WIFE contributes no spouse.
            if let Some(spouse) = family.spouse_of(id).filter(|s| is_relative(*s)) {
                spouses.insert(spouse.to_string());
            }
            for child in &family.child_ids {
                if is_relative(child.as_str()) && !children.contains(child) {
                    children.push(child.clone());
                }
            }
        }

        ResolvedPerson {
            individual: individual.clone(),
            parents,
            spouses,
            children,
        }
    }
}

//! Record types extracted from a GEDCOM file.
//!
//! Relationship edges are plain cross-reference ids (`@I1@`, `@F3@`). Nothing here holds a
//! reference to another record; traversal always goes back through the
//! [`RecordIndex`](crate::index::RecordIndex).

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// The top-level record kinds the index understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Individual,
    Family,
}

impl RecordKind {
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::Individual => "INDI",
            RecordKind::Family => "FAM",
        }
    }

    pub fn from_tag(tag: &str) -> Option<RecordKind> {
        match tag {
            "INDI" => Some(RecordKind::Individual),
            "FAM" => Some(RecordKind::Family),
            _ => None,
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Individual => write!(f, "individual"),
            RecordKind::Family => write!(f, "family"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
    U,
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Sex::M),
            "F" => Ok(Sex::F),
            "U" => Ok(Sex::U),
            other => Err(format!("unsupported SEX value `{other}`; expected M|F|U")),
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sex::M => "M",
            Sex::F => "F",
            Sex::U => "U",
        };
        write!(f, "{s}")
    }
}

/// A birth or death. Dates and places are kept as the raw strings found in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl Event {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.place.is_none()
    }

    /// `<date> in <place>`, either half may be missing.
    pub fn summary(&self) -> String {
        let date = self.date.as_deref().unwrap_or_default();
        match &self.place {
            Some(place) => format!("{date} in {place}"),
            None => date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<Event>,
    /// FAMC pointers, first-seen order, no repeats.
    pub child_of_family_ids: Vec<String>,
    /// FAMS pointers, first-seen order, no repeats.
    pub spouse_in_family_ids: Vec<String>,
}

impl IndividualRecord {
    pub fn new(id: impl Into<String>) -> Self {
        IndividualRecord {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Name used for headings. Falls back to `Unknown`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub husband_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wife_id: Option<String>,
    pub child_ids: Vec<String>,
}

impl FamilyRecord {
    pub fn new(id: impl Into<String>) -> Self {
        FamilyRecord {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Husband and wife ids, whichever are present.
    pub fn partners(&self) -> impl Iterator<Item = &str> {
        self.husband_id
            .as_deref()
            .into_iter()
            .chain(self.wife_id.as_deref())
    }

    /// The partner of `id` in this family.
    ///
    /// Returns `None` when `id` is neither husband nor wife, or when the other side is empty
    /// or is `id` itself.
    pub fn spouse_of(&self, id: &str) -> Option<&str> {
        let other = if self.husband_id.as_deref() == Some(id) {
            self.wife_id.as_deref()
        } else if self.wife_id.as_deref() == Some(id) {
            self.husband_id.as_deref()
        } else {
            None
        };
        other.filter(|other| *other != id)
    }
}

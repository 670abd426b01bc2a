#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::constants::{DEFAULT_CREDITS, DEFAULT_SUBJECTS};

/// A subject that can be taken in a semester.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize, Tabled)]
#[builder(on(String, into))]
pub struct Subject {
    /// Name of the subject, unique within a catalog
    #[tabled(rename = "Subject")]
    pub(crate) name:    String,
    /// Weight of the subject's grade point in the SGPA
    #[tabled(rename = "Credits")]
    #[serde(default = "default_credits")]
    #[builder(default = DEFAULT_CREDITS)]
    pub(crate) credits: u32,
}

/// Serde default for [`Subject::credits`].
fn default_credits() -> u32 {
    DEFAULT_CREDITS
}

impl Subject {
    /// Creates a subject. Zero credits fall back to the default.
    pub fn new(name: impl Into<String>, credits: u32) -> Self {
        let credits = if credits == 0 { DEFAULT_CREDITS } else { credits };
        Self {
            name: name.into(),
            credits,
        }
    }

    /// Name of the subject.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Credits of the subject.
    pub fn credits(&self) -> u32 {
        self.credits
    }
}

/// The ordered set of subjects known to an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Subject>", into = "Vec<Subject>")]
pub struct Catalog {
    /// Subjects in insertion order
    subjects: Vec<Subject>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_subjects(
            DEFAULT_SUBJECTS
                .iter()
                .map(|&(name, credits)| Subject::new(name, credits)),
        )
    }
}

impl From<Vec<Subject>> for Catalog {
    fn from(subjects: Vec<Subject>) -> Self {
        Self::from_subjects(subjects)
    }
}

impl From<Catalog> for Vec<Subject> {
    fn from(catalog: Catalog) -> Self {
        catalog.subjects
    }
}

impl Catalog {
    /// A catalog with no subjects.
    pub fn empty() -> Self {
        Self { subjects: vec![] }
    }

    /// Builds a catalog, keeping the first occurrence of each name and
    /// skipping empty names.
    pub fn from_subjects<I>(subjects: I) -> Self
    where
        I: IntoIterator<Item = Subject>,
    {
        let mut catalog = Self::empty();
        for subject in subjects {
            catalog.insert(subject);
        }
        catalog
    }

    /// Appends `subject` unless its name is empty or already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, subject: Subject) -> bool {
        if subject.name.is_empty() || self.contains(&subject.name) {
            return false;
        }
        let credits = if subject.credits == 0 { DEFAULT_CREDITS } else { subject.credits };
        self.subjects.push(Subject { credits, ..subject });
        true
    }

    /// Whether a subject called `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Looks up a subject by name.
    pub fn get(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Credits for `name`, falling back to the default for unknown names.
    pub fn credits(&self, name: &str) -> u32 {
        self.get(name).map_or(DEFAULT_CREDITS, Subject::credits)
    }

    /// Iterates over the subjects in order.
    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    /// Number of known subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the catalog has no subjects.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

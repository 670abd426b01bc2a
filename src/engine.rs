#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The SGPA engine: known subjects, the semester's selection, marks, and the
//! last calculated SGPA.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    constants::{DEFAULT_CREDITS, SEMESTERS},
    grade::{GradePoint, Sgpa, effective_mark},
    report::{Report, ReportRow},
    subject::{Catalog, Subject},
};

/// Errors raised by the engine's strict entry points.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The semester is outside of the selectable range
    #[error("Semester {0} is out of range, expected a value between 1 and 8")]
    SemesterOutOfRange(u8),
}

/// Holds all calculator state for one session.
///
/// Mutations never fail: empty or duplicate names are ignored, unparsable
/// marks count as 0, and unknown credits fall back to the default.
#[derive(Debug, Clone)]
pub struct SgpaEngine {
    /// Every subject that can be selected
    catalog:   Catalog,
    /// Subjects chosen for the semester, in the order they were chosen
    selection: Vec<String>,
    /// Marks entered for selected subjects. NaN marks an unparsable input.
    marks:     HashMap<String, f64>,
    /// Semester being calculated, informational only
    semester:  u8,
    /// SGPA as of the last calculation
    sgpa:      Option<Sgpa>,
}

impl Default for SgpaEngine {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

impl SgpaEngine {
    /// Creates an engine over `catalog` with nothing selected.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selection: vec![],
            marks: HashMap::new(),
            semester: *SEMESTERS.start(),
            sgpa: None,
        }
    }

    /// Defines a new subject with the default credits. Returns whether it
    /// was added.
    pub fn add_known_subject(&mut self, name: &str) -> bool {
        self.add_known_subject_with_credits(name, DEFAULT_CREDITS)
    }

    /// Defines a new subject with explicit credits. Zero credits fall back to
    /// the default.
    pub fn add_known_subject_with_credits(&mut self, name: &str, credits: u32) -> bool {
        let added = self.catalog.insert(Subject::new(name, credits));
        if added {
            debug!(subject = name, credits = self.catalog.credits(name), "Defined new subject");
        }
        added
    }

    /// Adds a known subject to the semester's selection. Returns whether it
    /// was added.
    pub fn select_subject(&mut self, name: &str) -> bool {
        if name.is_empty() || self.is_selected(name) || !self.catalog.contains(name) {
            return false;
        }
        self.selection.push(name.to_string());
        debug!(subject = name, "Selected subject");
        true
    }

    /// Drops a subject from the selection together with its mark. Removing
    /// a subject that is not selected changes nothing. Returns whether it
    /// was selected.
    pub fn remove_subject(&mut self, name: &str) -> bool {
        let before = self.selection.len();
        self.selection.retain(|s| s != name);
        self.marks.remove(name);
        let removed = self.selection.len() != before;
        if removed {
            debug!(subject = name, "Removed subject");
        }
        removed
    }

    /// Records a mark from user input. Input that does not parse as a number
    /// is kept as NaN and counts as 0. Marks for subjects that are not
    /// selected are ignored.
    pub fn set_mark(&mut self, name: &str, raw: &str) {
        let value = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
        self.set_mark_value(name, value);
    }

    /// Records a numeric mark for a selected subject.
    pub fn set_mark_value(&mut self, name: &str, value: f64) {
        if !self.is_selected(name) {
            return;
        }
        debug!(subject = name, mark = value, "Set mark");
        self.marks.insert(name.to_string(), value);
    }

    /// Maps a mark onto its grade point.
    pub fn grade_point(mark: f64) -> GradePoint {
        GradePoint::from_mark(mark)
    }

    /// Computes the credit-weighted average of the selection's grade points
    /// and stores it as the current SGPA. The stored value does not follow
    /// later edits until this is called again.
    pub fn calculate_sgpa(&mut self) -> Sgpa {
        let (weighted_sum, total_credits) =
            self.selection
                .iter()
                .fold((0f64, 0u64), |(sum, credits), subject| {
                    let credit = self.catalog.credits(subject);
                    let gp = Self::grade_point(self.effective_mark(subject));
                    (sum + f64::from(gp) * f64::from(credit), credits + u64::from(credit))
                });

        let sgpa = Sgpa::from_totals(weighted_sum, total_credits);
        info!(
            semester = self.semester,
            subjects = self.selection.len(),
            total_credits,
            %sgpa,
            "Calculated SGPA"
        );
        self.sgpa = Some(sgpa);
        sgpa
    }

    /// Builds the exportable report, or `None` if no SGPA has been
    /// calculated yet.
    pub fn build_report(&self) -> Option<Report> {
        let sgpa = self.sgpa?;
        let rows = self
            .selection
            .iter()
            .map(|subject| {
                let mark = self.effective_mark(subject);
                ReportRow::builder()
                    .subject(subject.clone())
                    .mark(mark)
                    .grade_point(Self::grade_point(mark))
                    .build()
            })
            .collect();

        Some(
            Report::builder()
                .semester(self.semester)
                .rows(rows)
                .sgpa(sgpa)
                .build(),
        )
    }

    /// Changes the informational semester number.
    pub fn set_semester(&mut self, semester: u8) -> Result<(), EngineError> {
        if !SEMESTERS.contains(&semester) {
            return Err(EngineError::SemesterOutOfRange(semester));
        }
        self.semester = semester;
        Ok(())
    }

    /// Semester being calculated.
    pub fn semester(&self) -> u8 {
        self.semester
    }

    /// All known subjects.
    pub fn known_subjects(&self) -> &Catalog {
        &self.catalog
    }

    /// Selected subject names, in selection order.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Known subjects that have not been selected yet.
    pub fn available_subjects(&self) -> impl Iterator<Item = &Subject> {
        self.catalog.iter().filter(|s| !self.is_selected(s.name()))
    }

    /// Whether `name` is part of the selection.
    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.iter().any(|s| s == name)
    }

    /// The raw mark entered for `name`, if any. May be NaN.
    pub fn mark(&self, name: &str) -> Option<f64> {
        self.marks.get(name).copied()
    }

    /// The SGPA from the last calculation, if any.
    pub fn sgpa(&self) -> Option<Sgpa> {
        self.sgpa
    }

    /// The mark used for calculation: missing and NaN marks count as 0.
    fn effective_mark(&self, name: &str) -> f64 {
        effective_mark(self.mark(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_requires_known_subject() {
        let mut engine = SgpaEngine::default();
        assert!(!engine.select_subject("Astronomy"));
        assert!(!engine.select_subject(""));
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn marks_for_unselected_subjects_are_ignored() {
        let mut engine = SgpaEngine::default();
        engine.set_mark("Engineering Physics", "80");
        assert_eq!(engine.mark("Engineering Physics"), None);
    }

    #[test]
    fn unparsable_marks_become_nan() {
        let mut engine = SgpaEngine::default();
        engine.select_subject("Engineering Physics");
        engine.set_mark("Engineering Physics", "eighty");
        assert!(engine.mark("Engineering Physics").is_some_and(f64::is_nan));
        engine.set_mark("Engineering Physics", " 81.5 ");
        assert_eq!(engine.mark("Engineering Physics"), Some(81.5));
    }

    #[test]
    fn available_subjects_exclude_selection() {
        let mut engine = SgpaEngine::default();
        engine.select_subject("Engineering Physics");
        assert_eq!(engine.available_subjects().count(), engine.known_subjects().len() - 1);
        assert!(
            engine
                .available_subjects()
                .all(|s| s.name() != "Engineering Physics")
        );
    }

    #[test]
    fn semester_is_validated() {
        let mut engine = SgpaEngine::default();
        assert_eq!(engine.semester(), 1);
        assert!(engine.set_semester(8).is_ok());
        assert_eq!(engine.set_semester(9), Err(EngineError::SemesterOutOfRange(9)));
        assert_eq!(engine.set_semester(0), Err(EngineError::SemesterOutOfRange(0)));
        assert_eq!(engine.semester(), 8);
    }

    #[test]
    fn custom_credits_weigh_in() {
        let mut engine = SgpaEngine::new(Catalog::empty());
        engine.add_known_subject_with_credits("Thesis", 6);
        engine.add_known_subject("Seminar");
        engine.select_subject("Thesis");
        engine.select_subject("Seminar");
        engine.set_mark_value("Thesis", 92.0);
        engine.set_mark_value("Seminar", 41.0);
        // (10 * 6 + 4 * 3) / 9 = 8.0
        assert_eq!(engine.calculate_sgpa().value(), 8.0);
    }

    #[test]
    fn huge_credit_totals_do_not_overflow() {
        let mut engine = SgpaEngine::new(Catalog::empty());
        engine.add_known_subject_with_credits("A", 3_000_000_000);
        engine.add_known_subject_with_credits("B", 4_000_000_000);
        engine.select_subject("A");
        engine.select_subject("B");
        engine.set_mark("A", "95");
        engine.set_mark("B", "95");
        assert_eq!(engine.calculate_sgpa().value(), 10.0);
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut engine = SgpaEngine::default();
        engine.select_subject("Engineering Physics");
        assert!(engine.remove_subject("Engineering Physics"));
        assert!(!engine.remove_subject("Engineering Physics"));
    }
}

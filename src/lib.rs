//! # sgpa
//!
//! A semester grade point average calculator: pick subjects, enter marks,
//! calculate a credit-weighted SGPA and export the result as a report.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Configuration read from the environment
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// The calculator state machine
pub mod engine;
/// Grade points and SGPA values
pub mod grade;
/// PDF export
pub mod pdf;
/// Reports and their renderers
pub mod report;
/// Interactive command session
pub mod session;
/// Subjects and the catalog of known subjects
pub mod subject;

pub use config::CalculatorConfig;
pub use engine::{EngineError, SgpaEngine};
pub use grade::{GradePoint, Sgpa, grade_point};
pub use report::{Report, ReportFormat, ReportRenderer, ReportRow};
pub use subject::{Catalog, Subject};

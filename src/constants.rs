#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::ops::RangeInclusive;

/// Credits assigned to a subject that has no explicit credit value.
pub const DEFAULT_CREDITS: u32 = 3;

/// Semesters that can be selected. Informational only, never part of the
/// calculation.
pub const SEMESTERS: RangeInclusive<u8> = 1..=8;

/// File name used when exporting a report without an explicit path.
pub const REPORT_FILE_NAME: &str = "sgpa_report.pdf";

/// Title printed at the top of every exported report.
pub const REPORT_TITLE: &str = "SGPA Report";

/// Number of decimal places an SGPA is rounded to.
pub const SGPA_DECIMALS: i32 = 2;

/// Subjects (and their credits) a fresh catalog starts with.
pub const DEFAULT_SUBJECTS: &[(&str, u32)] = &[
    ("Programming for Problem Solving", 4),
    ("Electrical Engineering", 3),
    ("Electronics Engineering", 3),
    ("Engineering Mechanics", 3),
    ("Engineering Physics", 3),
    ("Engineering Chemistry", 3),
    ("Engineering Mathematics I", 4),
    ("Communication Skills", 3),
];

/// Mark thresholds and the grade point they earn, highest first. A mark
/// earns the grade point of the first threshold it meets.
pub const GRADE_LADDER: &[(f64, u8)] = &[
    (90.0, 10),
    (75.0, 9),
    (65.0, 8),
    (55.0, 7),
    (50.0, 6),
    (45.0, 5),
    (40.0, 4),
];

/// Environment variable pointing at a JSON catalog file.
pub const CATALOG_ENV: &str = "SGPA_CATALOG";

/// Environment variable overriding the export path.
pub const REPORT_PATH_ENV: &str = "SGPA_REPORT_PATH";

/// Environment variable selecting the starting semester.
pub const SEMESTER_ENV: &str = "SGPA_DEFAULT_SEMESTER";

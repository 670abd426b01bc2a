#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bon::Builder;
use tracing::{debug, warn};

use crate::{
    constants::{CATALOG_ENV, REPORT_FILE_NAME, REPORT_PATH_ENV, SEMESTER_ENV, SEMESTERS},
    engine::SgpaEngine,
    subject::Catalog,
};

/// Settings a calculator session starts from.
#[derive(Debug, Clone, Builder)]
pub struct CalculatorConfig {
    /// Subjects known when the session starts
    #[builder(default)]
    catalog:     Catalog,
    /// Where reports are exported to when no path is given
    #[builder(default = PathBuf::from(REPORT_FILE_NAME), into)]
    report_path: PathBuf,
    /// Semester selected when the session starts
    #[builder(default = *SEMESTERS.start())]
    semester:    u8,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parses the optional starting semester, falling back to the first semester
/// when unset or invalid.
fn parse_semester(val: Option<String>) -> u8 {
    val.and_then(|s| s.trim().parse::<u8>().ok())
        .filter(|s| SEMESTERS.contains(s))
        .unwrap_or(*SEMESTERS.start())
}

/// Reads a JSON catalog: an array of `{"name": ..., "credits": ...}` objects,
/// where `credits` may be omitted.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Could not read catalog file: {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse catalog file: {}", path.display()))?;
    debug!(path = %path.display(), subjects = catalog.len(), "Loaded catalog");
    Ok(catalog)
}

impl CalculatorConfig {
    /// Builds a configuration from the environment. A `.env` file should
    /// already have been loaded by the caller.
    pub fn from_env() -> Result<Self> {
        let catalog = match std::env::var(CATALOG_ENV).ok() {
            Some(path) if !path.trim().is_empty() => load_catalog(Path::new(path.trim()))?,
            _ => Catalog::default(),
        };

        let report_path = std::env::var(REPORT_PATH_ENV)
            .ok()
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME));

        let raw_semester = std::env::var(SEMESTER_ENV).ok();
        let semester = parse_semester(raw_semester.clone());
        if let Some(raw) = raw_semester
            && raw.trim().parse::<u8>().ok() != Some(semester)
        {
            warn!(value = %raw, "Ignoring invalid {SEMESTER_ENV}, using semester {semester}");
        }

        Ok(Self {
            catalog,
            report_path,
            semester,
        })
    }

    /// Subjects known at start.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Default export path.
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Starting semester.
    pub fn semester(&self) -> u8 {
        self.semester
    }

    /// A fresh engine seeded from this configuration.
    pub fn engine(&self) -> SgpaEngine {
        let mut engine = SgpaEngine::new(self.catalog.clone());
        if let Err(e) = engine.set_semester(self.semester) {
            warn!("{e}, keeping semester {}", engine.semester());
        }
        engine
    }
}

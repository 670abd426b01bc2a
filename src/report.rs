#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fmt::Display, fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};
use tracing::info;

use crate::{
    constants::REPORT_TITLE,
    grade::{GradePoint, Sgpa},
    pdf::PdfRenderer,
};

/// One subject's line in a report.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct ReportRow {
    /// Name of the subject
    pub subject:     String,
    /// Mark the grade point was derived from
    pub mark:        f64,
    /// Grade point earned
    pub grade_point: GradePoint,
}

/// Snapshot of a calculated semester, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct Report {
    /// Semester the report was produced for
    #[builder(default = 1)]
    pub semester: u8,
    /// One row per selected subject, in selection order
    #[builder(default)]
    pub rows:     Vec<ReportRow>,
    /// SGPA at the time of calculation
    pub sgpa:     Sgpa,
}

/// Formats a mark without a trailing `.0` for whole numbers.
pub fn format_mark(mark: f64) -> String {
    if mark.fract() == 0.0 && mark.is_finite() {
        format!("{mark:.0}")
    } else {
        mark.to_string()
    }
}

impl Report {
    /// Table header cells, in column order.
    pub const HEADERS: [&'static str; 3] = ["Subject", "Marks", "Grade Point"];

    /// Rows as display strings, in column order.
    pub fn cells(&self) -> impl Iterator<Item = [String; 3]> + '_ {
        self.rows.iter().map(|row| {
            [
                row.subject.clone(),
                format_mark(row.mark),
                row.grade_point.to_string(),
            ]
        })
    }

    /// The line printed below the table.
    pub fn sgpa_line(&self) -> String {
        format!("SGPA: {}", self.sgpa)
    }
}

/// Errors that can occur while rendering a report.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// The report could not be serialized
    #[error("Could not serialize the report")]
    Serialize(#[from] serde_json::Error),
    /// Writing into the output buffer failed
    #[error("Could not write the rendered report")]
    Write(#[from] std::io::Error),
}

/// Turns a [`Report`] into the bytes of some document format.
pub trait ReportRenderer {
    /// Renders `report`.
    fn render(&self, report: &Report) -> Result<Vec<u8>, ReportError>;
}

/// Plain-text table for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer;

/// Display-ready row for [`TableRenderer`].
#[derive(Tabled)]
struct TableLine {
    /// Subject name
    #[tabled(rename = "Subject")]
    subject:     String,
    /// Formatted mark
    #[tabled(rename = "Marks")]
    marks:       String,
    /// Grade point
    #[tabled(rename = "Grade Point")]
    grade_point: String,
}

impl TableRenderer {
    /// Renders the report as a table string.
    pub fn to_table(&self, report: &Report) -> String {
        let lines = report
            .cells()
            .map(|[subject, marks, grade_point]| TableLine {
                subject,
                marks,
                grade_point,
            })
            .collect::<Vec<_>>();

        Table::new(&lines)
            .with(Panel::header(format!("{REPORT_TITLE} (Semester {})", report.semester)))
            .with(Panel::footer(report.sgpa_line()))
            .with(
                Modify::new(Rows::first())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
            .to_string()
    }
}

impl ReportRenderer for TableRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        Ok(self.to_table(report).into_bytes())
    }
}

/// Pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        Ok(serde_json::to_vec_pretty(report)?)
    }
}

/// Output formats a report can be exported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Terminal table
    #[default]
    Table,
    /// JSON document
    Json,
    /// PDF document
    Pdf,
}

impl ReportFormat {
    /// Renderer producing this format.
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Table => Box::new(TableRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
            ReportFormat::Pdf => Box::new(PdfRenderer::default()),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(format!("unknown report format `{other}`, expected table, json or pdf")),
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReportFormat::Table => "table",
            ReportFormat::Json => "json",
            ReportFormat::Pdf => "pdf",
        };
        write!(f, "{name}")
    }
}

/// Renders `report` with `renderer` and writes the result to `path`.
pub fn export(report: &Report, renderer: &dyn ReportRenderer, path: &Path) -> Result<()> {
    let bytes = renderer
        .render(report)
        .context("Something went wrong rendering the report.")?;
    fs::write(path, &bytes).with_context(|| format!("Could not write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Exported report");
    Ok(())
}

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! A small PDF 1.4 writer for [`Report`]s.
//!
//! Produces A4 pages using the standard Helvetica fonts, so no font data is
//! embedded: a title, a striped `Subject | Marks | Grade Point` table that
//! continues onto further pages when needed, and the SGPA below the table.

use std::io::Write;

use bon::Builder;

use crate::{
    constants::REPORT_TITLE,
    report::{Report, ReportError, ReportRenderer},
};

/// An RGB colour with components in `0.0..=1.0`.
type Rgb = (f32, f32, f32);

/// Page and table geometry, in PDF points.
#[derive(Debug, Clone, Builder)]
pub struct PdfRenderer {
    /// Page width
    #[builder(default = 595.28)]
    page_width:   f32,
    /// Page height
    #[builder(default = 841.89)]
    page_height:  f32,
    /// Left, right and top margin
    #[builder(default = 28.35)]
    margin:       f32,
    /// Height of a table row
    #[builder(default = 22.0)]
    row_height:   f32,
    /// Font size of the title
    #[builder(default = 20.0)]
    title_size:   f32,
    /// Font size of table cells
    #[builder(default = 10.0)]
    body_size:    f32,
    /// Font size of the SGPA line
    #[builder(default = 14.0)]
    summary_size: f32,
    /// Fill behind the header row
    #[builder(default = (0.16, 0.5, 0.73))]
    header_fill:  Rgb,
    /// Fill behind every other body row
    #[builder(default = (0.96, 0.96, 0.96))]
    stripe_fill:  Rgb,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Share of the table width given to each column.
const COLUMN_SHARES: [f32; 3] = [0.6, 0.2, 0.2];

/// Horizontal padding inside a cell.
const CELL_PADDING: f32 = 5.0;

/// Escapes a string for use inside a PDF literal string. Characters outside
/// printable ASCII are replaced, the standard fonts have no glyphs for them.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Cuts `text` so that it roughly fits `width` points at `size`, using the
/// average Helvetica glyph width.
fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = ((width / (size * 0.5)).floor() as usize).max(4);
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars - 3).collect();
    cut.push_str("...");
    cut
}

/// Builds the drawing operators of a single page.
struct PageCanvas {
    /// Content stream operators
    ops: String,
}

impl PageCanvas {
    /// An empty page.
    fn new() -> Self {
        Self { ops: String::new() }
    }

    /// Fills a rectangle whose lower-left corner is `(x, y)`.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, (r, g, b): Rgb) {
        self.ops
            .push_str(&format!("{r:.3} {g:.3} {b:.3} rg\n{x:.2} {y:.2} {w:.2} {h:.2} re f\n"));
    }

    /// Writes `text` with its baseline starting at `(x, y)`.
    fn text(&mut self, x: f32, y: f32, font: &str, size: f32, (r, g, b): Rgb, text: &str) {
        self.ops.push_str(&format!(
            "BT\n{r:.3} {g:.3} {b:.3} rg\n/{font} {size:.1} Tf\n{x:.2} {y:.2} Td\n({}) Tj\nET\n",
            escape(text)
        ));
    }
}

impl PdfRenderer {
    /// Lays the report out onto as many pages as it needs.
    fn layout(&self, report: &Report) -> Vec<PageCanvas> {
        let black = (0.0, 0.0, 0.0);
        let white = (1.0, 1.0, 1.0);
        let table_width = self.page_width - 2.0 * self.margin;
        let widths = COLUMN_SHARES.map(|share| share * table_width);
        let column_x = [
            self.margin,
            self.margin + widths[0],
            self.margin + widths[0] + widths[1],
        ];
        let text_offset = (self.row_height - self.body_size) / 2.0 + 1.5;

        let mut pages = vec![];
        let mut page = PageCanvas::new();
        let mut top = self.page_height - self.margin;

        page.text(self.margin, top - self.title_size, "F2", self.title_size, black, REPORT_TITLE);
        page.text(
            self.margin,
            top - self.title_size - 18.0,
            "F1",
            self.body_size,
            black,
            &format!("Semester {}", report.semester),
        );
        top -= 3.0 * self.margin;

        let header = |page: &mut PageCanvas, top: f32| {
            let bottom = top - self.row_height;
            page.fill_rect(self.margin, bottom, table_width, self.row_height, self.header_fill);
            for (i, title) in Report::HEADERS.iter().enumerate() {
                page.text(
                    column_x[i] + CELL_PADDING,
                    top - self.row_height + text_offset,
                    "F2",
                    self.body_size,
                    white,
                    title,
                );
            }
        };

        header(&mut page, top);
        top -= self.row_height;

        for (index, cells) in report.cells().enumerate() {
            if top - self.row_height < self.margin {
                pages.push(std::mem::replace(&mut page, PageCanvas::new()));
                top = self.page_height - self.margin;
                header(&mut page, top);
                top -= self.row_height;
            }
            if index % 2 == 1 {
                let bottom = top - self.row_height;
                page.fill_rect(self.margin, bottom, table_width, self.row_height, self.stripe_fill);
            }
            for (i, cell) in cells.iter().enumerate() {
                let cell = fit(cell, widths[i] - 2.0 * CELL_PADDING, self.body_size);
                page.text(
                    column_x[i] + CELL_PADDING,
                    top - self.row_height + text_offset,
                    "F1",
                    self.body_size,
                    black,
                    &cell,
                );
            }
            top -= self.row_height;
        }

        let summary_drop = 2.0 * self.summary_size;
        if top - summary_drop < self.margin {
            pages.push(std::mem::replace(&mut page, PageCanvas::new()));
            top = self.page_height - self.margin;
        }
        page.text(
            self.margin,
            top - summary_drop,
            "F2",
            self.summary_size,
            black,
            &report.sgpa_line(),
        );
        pages.push(page);
        pages
    }
}

/// Serializes numbered objects and keeps their byte offsets for the xref
/// table.
struct PdfWriter {
    /// Document bytes written so far
    buf:     Vec<u8>,
    /// Byte offset of each object, indexed by object number - 1
    offsets: Vec<usize>,
}

impl PdfWriter {
    /// Starts a document with the PDF header.
    fn new() -> Result<Self, ReportError> {
        let mut buf = vec![];
        buf.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        Ok(Self { buf, offsets: vec![] })
    }

    /// Writes object number `offsets.len() + 1` with the given body.
    fn object(&mut self, body: &str) -> Result<(), ReportError> {
        self.offsets.push(self.buf.len());
        let number = self.offsets.len();
        write!(self.buf, "{number} 0 obj\n{body}\nendobj\n")?;
        Ok(())
    }

    /// Writes a stream object holding `content`.
    fn stream(&mut self, content: &str) -> Result<(), ReportError> {
        self.object(&format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ))
    }

    /// Writes the xref table and trailer, returning the finished document.
    fn finish(mut self) -> Result<Vec<u8>, ReportError> {
        let xref = self.buf.len();
        write!(self.buf, "xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1)?;
        for offset in &self.offsets {
            write!(self.buf, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            self.offsets.len() + 1
        )?;
        Ok(self.buf)
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        let pages = self.layout(report);
        // 1: catalog, 2: page tree, 3-4: fonts, then a page and its content
        // stream for every page.
        let page_ids = (0..pages.len()).map(|i| 5 + 2 * i).collect::<Vec<_>>();
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut writer = PdfWriter::new()?;
        writer.object("<< /Type /Catalog /Pages 2 0 R >>")?;
        writer.object(&format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()))?;
        writer.object(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        )?;
        writer.object(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding \
             /WinAnsiEncoding >>",
        )?;
        for (page, id) in pages.iter().zip(&page_ids) {
            writer.object(&format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << \
                 /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                self.page_width,
                self.page_height,
                id + 1
            ))?;
            writer.stream(&page.ops)?;
        }
        writer.finish()
    }
}

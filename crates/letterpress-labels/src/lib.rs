#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Mailing-label layout: arranges records into paginated grids for an
//! external rendering backend.
//!
//! # Design
//! - The layout itself is driven purely by pitch and column/row counts; cell
//!   width and height describe inner margins and never move the grid.
//! - Records are consumed strictly in input order and the page/cell order of
//!   the output matches it exactly; the column/row cursor is shared mutable
//!   state, so this stage must not be parallelised.
//! - This crate produces strings and grids only; turning a [`Page`] sequence
//!   into PDF bytes is the renderer's job. Point-conversion helpers are
//!   provided for it.

use letterpress_merge::{TagContext, TagDelimiters, substitute_tags};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;
mod style;

pub use error::{LabelError, LabelResult};
pub use style::AddressStyle;

/// PostScript points per inch.
const POINTS_PER_INCH: f64 = 72.0;
/// PostScript points per centimetre.
const POINTS_PER_CM: f64 = POINTS_PER_INCH / 2.54;

/// Supported physical sheet sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// ISO A4, 210 × 297 mm.
    A4,
    /// US letter, 8.5 × 11 in.
    Letter,
}

impl PaperSize {
    /// Sheet dimensions in points, `(width, height)`.
    #[must_use]
    pub const fn points(self) -> (f64, f64) {
        match self {
            Self::A4 => (21.0 * POINTS_PER_CM, 29.7 * POINTS_PER_CM),
            Self::Letter => (8.5 * POINTS_PER_INCH, 11.0 * POINTS_PER_INCH),
        }
    }
}

/// Measurement system for sheet geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Imperial inches.
    Inch,
    /// Metric centimetres.
    Cm,
}

impl UnitSystem {
    /// Points per one unit of this system.
    #[must_use]
    pub const fn points_per_unit(self) -> f64 {
        match self {
            Self::Inch => POINTS_PER_INCH,
            Self::Cm => POINTS_PER_CM,
        }
    }
}

/// Geometry of one label sheet.
///
/// Pitch is the centre-to-centre spacing between cells; `width` and `height`
/// describe the printable area inside a cell and are informational only.
/// All measurements are expressed in `units`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetSpec {
    /// Physical sheet size.
    #[serde(rename = "papersize")]
    pub paper: PaperSize,
    /// Measurement system for the fields below.
    pub units: UnitSystem,
    /// Horizontal centre-to-centre spacing between cells.
    pub hpitch: f64,
    /// Vertical centre-to-centre spacing between cells.
    pub vpitch: f64,
    /// Printable cell width (inner margin, does not affect placement).
    pub width: f64,
    /// Printable cell height (inner margin, does not affect placement).
    pub height: f64,
    /// Left sheet margin.
    pub lmargin: f64,
    /// Top sheet margin.
    pub tmargin: f64,
    /// Cells per row.
    pub cols: usize,
    /// Rows per page.
    pub rows: usize,
}

impl SheetSpec {
    /// Check that every measurement is positive and the grid is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::InvalidSpec`] naming the first offending field.
    pub fn validate(&self) -> LabelResult<()> {
        let measurements = [
            ("hpitch", self.hpitch),
            ("vpitch", self.vpitch),
            ("width", self.width),
            ("height", self.height),
            ("lmargin", self.lmargin),
            ("tmargin", self.tmargin),
        ];
        for (field, value) in measurements {
            if !value.is_finite() || value <= 0.0 {
                return Err(LabelError::invalid_spec(
                    field,
                    "must be a positive number",
                    value,
                ));
            }
        }
        if self.cols == 0 {
            return Err(LabelError::invalid_spec("cols", "must be at least 1", 0));
        }
        if self.rows == 0 {
            return Err(LabelError::invalid_spec("rows", "must be at least 1", 0));
        }
        Ok(())
    }

    /// Horizontal pitch in points.
    #[must_use]
    pub const fn hpitch_points(&self) -> f64 {
        self.hpitch * self.units.points_per_unit()
    }

    /// Vertical pitch in points.
    #[must_use]
    pub const fn vpitch_points(&self) -> f64 {
        self.vpitch * self.units.points_per_unit()
    }

    /// Left margin in points.
    #[must_use]
    pub const fn lmargin_points(&self) -> f64 {
        self.lmargin * self.units.points_per_unit()
    }

    /// Top margin in points.
    #[must_use]
    pub const fn tmargin_points(&self) -> f64 {
        self.tmargin * self.units.points_per_unit()
    }

    /// Font size hint for the renderer: dense sheets drop to a smaller face.
    #[must_use]
    pub const fn point_size(&self) -> u8 {
        if self.rows > 8 { 8 } else { 10 }
    }
}

/// One record's worth of address fields feeding a single label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingRecord {
    /// Recipient name.
    pub name: String,
    /// Street address, possibly multi-line.
    pub address: String,
    /// Town or city.
    pub town: String,
    /// County, state, or region.
    pub county: String,
    /// Postal code.
    pub postcode: String,
}

/// One sheet's worth of label cells, `rows × cols`.
///
/// Unfilled cells hold empty strings; they are placeholders, never dropped,
/// so cell coordinates always line up with the physical sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Cell grid, outer index row, inner index column.
    pub cells: Vec<Vec<String>>,
}

impl Page {
    /// Number of rows in the grid.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns in the grid.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }
}

/// Format one record into a label string for the given locale.
///
/// The record's fields are merged into the locale's address template and the
/// result is entity-decoded, since stored fields are ASCII-safe but the
/// renderer wants real Unicode text. The name field is trimmed.
#[must_use]
pub fn format_label(record: &MailingRecord, locale: &str) -> String {
    let context = TagContext::new()
        .with("NAME", record.name.trim())
        .with("ADDRESS", record.address.as_str())
        .with("TOWN", record.town.as_str())
        .with("COUNTY", record.county.as_str())
        .with("POSTCODE", record.postcode.as_str());
    let style = AddressStyle::for_locale(locale);
    let merged = substitute_tags(style.template(), &context, false, &TagDelimiters::literal());
    letterpress_entity::decode(&merged)
}

/// Arrange records into an ordered sequence of label pages.
///
/// Records fill each page left to right, top to bottom, in input order. A
/// partially filled trailing page is emitted as long as it holds at least
/// one label; when the records exactly fill the last page, no empty page
/// follows.
///
/// # Errors
///
/// Returns [`LabelError::InvalidSpec`] when the sheet specification fails
/// [`SheetSpec::validate`].
pub fn layout(
    records: &[MailingRecord],
    spec: &SheetSpec,
    locale: &str,
) -> LabelResult<Vec<Page>> {
    spec.validate()?;
    debug!(
        records = records.len(),
        cols = spec.cols,
        rows = spec.rows,
        "laying out mailing labels"
    );
    let mut pages = Vec::new();
    let mut cursor = GridCursor::new(spec.cols, spec.rows);
    for record in records {
        if let Some(page) = cursor.place(format_label(record, locale)) {
            pages.push(page);
        }
    }
    if let Some(page) = cursor.finish() {
        pages.push(page);
    }
    Ok(pages)
}

/// Accumulator for the column/row walk across record order.
///
/// Kept separate from [`layout`] so the placement arithmetic is testable
/// without any formatting involved.
struct GridCursor {
    cols: usize,
    rows: usize,
    col: usize,
    row: usize,
    cells: Vec<Vec<String>>,
    occupied: bool,
}

impl GridCursor {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            col: 0,
            row: 0,
            cells: Self::empty_grid(cols, rows),
            occupied: false,
        }
    }

    fn empty_grid(cols: usize, rows: usize) -> Vec<Vec<String>> {
        vec![vec![String::new(); cols]; rows]
    }

    /// Place one label, returning a completed page when the grid fills.
    fn place(&mut self, label: String) -> Option<Page> {
        self.cells[self.row][self.col] = label;
        self.occupied = true;
        self.col += 1;
        if self.col == self.cols {
            self.col = 0;
            self.row += 1;
            if self.row == self.rows {
                self.row = 0;
                self.occupied = false;
                let cells = std::mem::replace(&mut self.cells, Self::empty_grid(self.cols, self.rows));
                return Some(Page { cells });
            }
        }
        None
    }

    /// Emit the trailing page when it holds at least one label.
    fn finish(self) -> Option<Page> {
        self.occupied.then_some(Page { cells: self.cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> MailingRecord {
        MailingRecord {
            name: format!("Person {n}"),
            address: format!("{n} High Street"),
            town: "Selby".to_owned(),
            county: "North Yorkshire".to_owned(),
            postcode: "YO8 4QH".to_owned(),
        }
    }

    fn spec_2x2() -> SheetSpec {
        SheetSpec {
            paper: PaperSize::A4,
            units: UnitSystem::Cm,
            hpitch: 10.5,
            vpitch: 3.5,
            width: 9.5,
            height: 3.0,
            lmargin: 0.5,
            tmargin: 1.5,
            cols: 2,
            rows: 2,
        }
    }

    #[test]
    fn uk_label_puts_the_postcode_alone_on_the_last_line() {
        let label = format_label(&record(1), "en_GB");
        assert_eq!(
            label,
            "Person 1\n1 High Street\nSelby\nNorth Yorkshire\nYO8 4QH"
        );
    }

    #[test]
    fn default_label_combines_postcode_and_town() {
        let label = format_label(&record(1), "fr");
        assert_eq!(
            label,
            "Person 1\n1 High Street\nYO8 4QH Selby North Yorkshire"
        );
    }

    #[test]
    fn us_label_ends_with_town_county_postcode() {
        let label = format_label(&record(1), "en");
        assert_eq!(
            label,
            "Person 1\n1 High Street\nSelby North Yorkshire YO8 4QH"
        );
    }

    #[test]
    fn label_fields_are_entity_decoded_and_name_trimmed() {
        let rec = MailingRecord {
            name: "  Ren&#233;e  ".to_owned(),
            address: "Caf&eacute; Lane".to_owned(),
            town: "T".to_owned(),
            county: "C".to_owned(),
            postcode: "P".to_owned(),
        };
        let label = format_label(&rec, "en_GB");
        assert_eq!(label, "Renée\nCafé Lane\nT\nC\nP");
    }

    #[test]
    fn seven_records_on_a_two_by_two_sheet_yield_two_pages() {
        let records: Vec<MailingRecord> = (1..=7).map(record).collect();
        let pages = layout(&records, &spec_2x2(), "en_GB").expect("valid spec");
        assert_eq!(pages.len(), 2);

        let first = &pages[0];
        assert_eq!(first.rows(), 2);
        assert_eq!(first.cols(), 2);
        assert!(first.cells.iter().flatten().all(|cell| !cell.is_empty()));
        assert!(first.cells[0][0].starts_with("Person 1"));
        assert!(first.cells[0][1].starts_with("Person 2"));
        assert!(first.cells[1][0].starts_with("Person 3"));
        assert!(first.cells[1][1].starts_with("Person 4"));

        let second = &pages[1];
        assert!(second.cells[0][0].starts_with("Person 5"));
        assert!(second.cells[0][1].starts_with("Person 6"));
        assert!(second.cells[1][0].starts_with("Person 7"));
        assert_eq!(second.cells[1][1], "");
    }

    #[test]
    fn exactly_filled_sheets_emit_no_trailing_empty_page() {
        let records: Vec<MailingRecord> = (1..=4).map(record).collect();
        let pages = layout(&records, &spec_2x2(), "en_GB").expect("valid spec");
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn no_records_yield_no_pages() {
        let pages = layout(&[], &spec_2x2(), "en_GB").expect("valid spec");
        assert!(pages.is_empty());
    }

    #[test]
    fn validation_rejects_non_positive_measurements() {
        let mut spec = spec_2x2();
        spec.vpitch = 0.0;
        let err = spec.validate().expect_err("zero pitch");
        assert!(matches!(
            err,
            LabelError::InvalidSpec { field: "vpitch", .. }
        ));

        let mut spec = spec_2x2();
        spec.cols = 0;
        let err = spec.validate().expect_err("zero cols");
        assert!(matches!(err, LabelError::InvalidSpec { field: "cols", .. }));
    }

    #[test]
    fn point_conversions_match_the_renderer_expectations() {
        let spec = spec_2x2();
        let per_cm = UnitSystem::Cm.points_per_unit();
        assert!((spec.hpitch_points() - 10.5 * per_cm).abs() < 1e-9);
        assert!((UnitSystem::Inch.points_per_unit() - 72.0).abs() < f64::EPSILON);
        let (w, h) = PaperSize::Letter.points();
        assert!((w - 612.0).abs() < f64::EPSILON);
        assert!((h - 792.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dense_sheets_get_the_smaller_font_hint() {
        let mut spec = spec_2x2();
        assert_eq!(spec.point_size(), 10);
        spec.rows = 9;
        assert_eq!(spec.point_size(), 8);
    }
}

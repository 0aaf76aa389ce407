//! Sample data shared by the integration suites.

use letterpress_labels::{MailingRecord, PaperSize, SheetSpec, UnitSystem};
use letterpress_merge::TagContext;

/// Sequentially numbered mailing records, `Person 1` through `Person n`.
#[must_use]
pub fn sample_records(count: usize) -> Vec<MailingRecord> {
    (1..=count)
        .map(|n| MailingRecord {
            name: format!("Person {n}"),
            address: format!("{n} High Street"),
            town: "Selby".to_owned(),
            county: "North Yorkshire".to_owned(),
            postcode: "YO8 4QH".to_owned(),
        })
        .collect()
}

/// A common two-across, seven-down A4 address label sheet.
#[must_use]
pub fn a4_two_by_seven() -> SheetSpec {
    SheetSpec {
        paper: PaperSize::A4,
        units: UnitSystem::Cm,
        hpitch: 10.09,
        vpitch: 3.81,
        width: 9.91,
        height: 3.81,
        lmargin: 0.46,
        tmargin: 1.52,
        cols: 2,
        rows: 7,
    }
}

/// A US letter sheet, three across and ten down, measured in inches.
#[must_use]
pub fn letter_three_by_ten() -> SheetSpec {
    SheetSpec {
        paper: PaperSize::Letter,
        units: UnitSystem::Inch,
        hpitch: 2.75,
        vpitch: 1.0,
        width: 2.63,
        height: 1.0,
        lmargin: 0.19,
        tmargin: 0.5,
        cols: 3,
        rows: 10,
    }
}

/// Merge rows with a destination address, name, and reference number each.
///
/// Addresses follow the pattern `person<n>@example.org`.
#[must_use]
pub fn mail_rows(count: usize) -> Vec<TagContext> {
    (1..=count)
        .map(|n| {
            TagContext::new()
                .with("EMAILADDRESS", format!("person{n}@example.org"))
                .with("NAME", format!("Person {n}"))
                .with("REFERENCE", format!("REF-{n:04}"))
        })
        .collect()
}

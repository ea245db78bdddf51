pub mod anchors;
pub mod legend;
pub mod normalize;
pub mod records;
pub mod schema;
pub mod tokenize;

use std::ops::Range;

use tracing::info;

use crate::error::ParseError;
use crate::model::{ApartmentRecord, ColumnSchema};
use legend::StatusLegend;
use normalize::defaults::FallbackPolicy;
use normalize::NormalizeOptions;

/// Fixed row positions of the published sheet (0-based).
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub start_marker: String,
    pub end_marker: String,
    pub header_row: usize,
    pub legend_rows: Range<usize>,
    pub en_subject_row: usize,
    pub sq_subject_row: usize,
    pub keyword_row: usize,
    pub visibility_row: usize,
    pub mk_subject_row: usize,
    pub first_data_row: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            start_marker: "anchor1".to_string(),
            end_marker: "anchor2".to_string(),
            header_row: 0,
            legend_rows: 1..4,
            en_subject_row: 2,
            sq_subject_row: 3,
            keyword_row: 7,
            visibility_row: 8,
            mk_subject_row: 9,
            first_data_row: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub schema: Vec<ColumnSchema>,
    pub legend: StatusLegend,
    pub records: Vec<ApartmentRecord>,
}

/// CSV text → normalized records: tokenize, locate anchors, build schema and
/// legend, extract rows, normalize fields.
pub fn parse(
    text: &str,
    layout: &SheetLayout,
    options: &NormalizeOptions,
    policy: &mut dyn FallbackPolicy,
) -> Result<ParsedSheet, ParseError> {
    let rows = tokenize::split_rows(text);
    let header = rows.get(layout.header_row).ok_or(ParseError::EmptyDocument)?;
    let anchors = anchors::locate(header, &layout.start_marker, &layout.end_marker)?;

    let schema = schema::build(&rows, &anchors, layout);
    let legend = legend::extract(&rows, &anchors, layout);
    let raws = records::extract(&rows, &anchors, &schema, layout);
    let records = normalize::normalize_all(raws, options, policy);

    info!(
        rows = rows.len(),
        columns = schema.len(),
        legend = legend.entries().len(),
        records = records.len(),
        "Parsed sheet"
    );

    Ok(ParsedSheet {
        schema,
        legend,
        records,
    })
}

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::model::{ColumnSchema, RawField};

use super::anchors::Anchors;
use super::tokenize::cell;
use super::SheetLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub row_index: usize,
    pub raw_fields: IndexMap<String, RawField>,
}

/// One raw record per data row whose id cell is non-empty.
///
/// Columns sharing a canonical label collapse into one map entry; the later
/// column's value wins. A repeated id keeps its first row.
pub fn extract(
    rows: &[Vec<String>],
    anchors: &Anchors,
    schema: &[ColumnSchema],
    layout: &SheetLayout,
) -> Vec<RawRecord> {
    let id_col = anchors.id_column();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for row_index in layout.first_data_row..rows.len() {
        let id = cell(rows, row_index, id_col);
        if id.is_empty() {
            continue;
        }
        if !seen.insert(id.to_string()) {
            warn!(id, row = row_index, "Duplicate apartment id, keeping first row");
            continue;
        }

        let mut raw_fields = IndexMap::with_capacity(schema.len());
        for column in schema {
            raw_fields.insert(
                column.field_key(),
                RawField {
                    value: cell(rows, row_index, column.column_index).to_string(),
                    column_index: column.column_index,
                    filter_keyword: column.filter_keyword.clone(),
                    is_visible: column.is_visible,
                    subjects: column.subjects.clone(),
                },
            );
        }

        records.push(RawRecord {
            id: id.to_string(),
            row_index,
            raw_fields,
        });
    }

    records
}

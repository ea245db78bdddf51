use crate::model::{ColumnSchema, Subjects};

use super::anchors::Anchors;
use super::tokenize::cell;
use super::SheetLayout;

const CHECKED_GLYPHS: &[&str] = &["✓", "✔", "☑", "✅"];

/// Checkbox cell to bool. Only a checked glyph, `true` or `1` count as checked.
pub fn is_checked(value: &str) -> bool {
    let v = value.trim();
    CHECKED_GLYPHS.contains(&v) || v.eq_ignore_ascii_case("true") || v == "1"
}

/// One entry per data column, in column order. Columns are never dropped here.
pub fn build(rows: &[Vec<String>], anchors: &Anchors, layout: &SheetLayout) -> Vec<ColumnSchema> {
    anchors
        .data_columns()
        .map(|col| ColumnSchema {
            column_index: col,
            filter_keyword: cell(rows, layout.keyword_row, col).to_string(),
            is_visible: is_checked(cell(rows, layout.visibility_row, col)),
            subjects: Subjects {
                mk: cell(rows, layout.mk_subject_row, col).to_string(),
                en: cell(rows, layout.en_subject_row, col).to_string(),
                sq: cell(rows, layout.sq_subject_row, col).to_string(),
            },
        })
        .collect()
}

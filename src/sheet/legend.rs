use serde::Serialize;

use crate::model::Status;

use super::anchors::Anchors;
use super::normalize::values::status_from_token;
use super::tokenize::cell;
use super::SheetLayout;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub code: String,
    pub label: String,
    /// Canonical status of `code`, when the lexical table knows it.
    pub status: Option<Status>,
}

/// Display text for raw status codes. Advisory only; classification does not read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusLegend {
    entries: Vec<LegendEntry>,
}

impl StatusLegend {
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn label_for_code(&self, code: &str) -> Option<&str> {
        let code = code.trim();
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }

    pub fn label_for_status(&self, status: Status) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.status == Some(status))
            .map(|e| e.label.as_str())
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(code, label)| {
                let code = code.into();
                LegendEntry {
                    status: status_from_token(&code),
                    code,
                    label: label.into(),
                }
            })
            .collect();
        StatusLegend { entries }
    }
}

/// Read (code, label) pairs right of the end anchor. Incomplete pairs are skipped.
pub fn extract(rows: &[Vec<String>], anchors: &Anchors, layout: &SheetLayout) -> StatusLegend {
    let pairs = layout.legend_rows.clone().filter_map(|row| {
        let code = cell(rows, row, anchors.legend_code_column());
        let label = cell(rows, row, anchors.legend_label_column());
        if code.is_empty() || label.is_empty() {
            None
        } else {
            Some((code.to_string(), label.to_string()))
        }
    });
    StatusLegend::from_pairs(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::tokenize::split_rows;

    #[test]
    fn reads_pairs_and_skips_incomplete() {
        let csv = "\
anchor1,,anchor2,,
,,,1,Слободен
,,,2,
,,,3,Продаден";
        let rows = split_rows(csv);
        let legend = extract(&rows, &Anchors { start: 0, end: 2 }, &SheetLayout::default());

        assert_eq!(legend.entries().len(), 2);
        assert_eq!(legend.label_for_code("1"), Some("Слободен"));
        assert_eq!(legend.label_for_code("2"), None);
        assert_eq!(legend.label_for_status(Status::Sold), Some("Продаден"));
    }

    #[test]
    fn empty_legend_is_fine() {
        let rows = split_rows("anchor1,anchor2");
        let legend = extract(&rows, &Anchors { start: 0, end: 1 }, &SheetLayout::default());
        assert!(legend.is_empty());
    }
}

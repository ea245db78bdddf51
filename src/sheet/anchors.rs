use crate::error::ParseError;

/// Column positions of the two header markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub start: usize,
    pub end: usize,
}

impl Anchors {
    /// Apartment-data columns, strictly between the two markers.
    pub fn data_columns(&self) -> std::ops::Range<usize> {
        (self.start + 1)..self.end.max(self.start + 1)
    }

    pub fn id_column(&self) -> usize {
        self.start + 1
    }

    pub fn legend_code_column(&self) -> usize {
        self.end + 1
    }

    pub fn legend_label_column(&self) -> usize {
        self.end + 2
    }
}

/// Find both markers in the header row (case-insensitive substring match).
pub fn locate(header: &[String], start_marker: &str, end_marker: &str) -> Result<Anchors, ParseError> {
    let find = |marker: &str| -> Result<usize, ParseError> {
        let needle = marker.to_lowercase();
        header
            .iter()
            .position(|c| c.to_lowercase().contains(&needle))
            .ok_or_else(|| ParseError::MissingAnchor {
                marker: marker.to_string(),
            })
    };

    Ok(Anchors {
        start: find(start_marker)?,
        end: find(end_marker)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::tokenize::split_line;

    #[test]
    fn finds_markers_case_insensitively() {
        let header = split_line("x,ANCHOR1,,,,Anchor2,,");
        let a = locate(&header, "anchor1", "anchor2").unwrap();
        assert_eq!(a, Anchors { start: 1, end: 5 });
        assert_eq!(a.data_columns(), 2..5);
        assert_eq!(a.id_column(), 2);
        assert_eq!(a.legend_code_column(), 6);
        assert_eq!(a.legend_label_column(), 7);
    }

    #[test]
    fn missing_marker_is_an_error() {
        let header = split_line("anchor1,a,b");
        assert_eq!(
            locate(&header, "anchor1", "anchor2"),
            Err(ParseError::MissingAnchor {
                marker: "anchor2".into()
            })
        );
    }

    #[test]
    fn reversed_markers_give_empty_range() {
        let a = Anchors { start: 5, end: 2 };
        assert!(a.data_columns().is_empty());
    }
}

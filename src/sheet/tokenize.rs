/// Split one CSV line into cells.
///
/// Commas inside double quotes do not split. Quote characters are dropped and
/// every cell is trimmed. An unbalanced quote simply leaves the rest of the
/// line inside one cell.
pub fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());

    cells
}

/// Split a whole document into rows of cells. A trailing blank line is dropped.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows: Vec<Vec<String>> = text
        .lines()
        .map(|l| split_line(l.trim_end_matches('\r')))
        .collect();

    while rows
        .last()
        .is_some_and(|r| r.iter().all(|c| c.is_empty()))
    {
        rows.pop();
    }

    rows
}

/// Cell at (`row`, `col`), empty when out of bounds.
pub fn cell(rows: &[Vec<String>], row: usize, col: usize) -> &str {
    rows.get(row)
        .and_then(|r| r.get(col))
        .map(|s| s.as_str())
        .unwrap_or("")
}

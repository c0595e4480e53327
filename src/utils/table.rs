//! Table rendering utilities for CLI outputs.

use super::formatting::{pad_left, pad_right, visible_len};

pub struct Column {
    pub header: String,
    pub right: bool,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            right: false,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            right: true,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| visible_len(c))
                    .chain(std::iter::once(visible_len(&col.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn cell(&self, i: usize, value: &str, width: usize) -> String {
        if self.columns[i].right {
            pad_left(value, width)
        } else {
            pad_right(value, width)
        }
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        // Header
        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| self.cell(i, &col.header, widths[i]))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        // Rows
        for row in &self.rows {
            let cells: Vec<String> = (0..self.columns.len())
                .map(|i| self.cell(i, row.get(i).map(String::as_str).unwrap_or(""), widths[i]))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_grow_to_fit_content() {
        let mut t = Table::new(vec![Column::left("Date"), Column::right("Total")]);
        t.add_row(vec!["2025-09-01".into(), "19500.00".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Date           Total");
        assert_eq!(lines[1], "2025-09-01  19500.00");
    }
}

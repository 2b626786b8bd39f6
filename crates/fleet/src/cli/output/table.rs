//! Tab-aligned rows, padded to the widest cell of each column

use std::io::{self, Write};

use console::measure_text_width;

/// Narrowest a padded column gets
pub const MIN_WIDTH: usize = 10;

/// Spaces added after the widest cell of a column
pub const PADDING: usize = 1;

/// Rows of cells written as aligned columns.
///
/// Every column but the last is padded; the last cell of a row is written as
/// is so lines carry no trailing spaces.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = measure_text_width(cell) + PADDING;
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width.max(MIN_WIDTH)),
                }
            }
        }
        widths
    }

    /// Write every row, one per line
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let widths = self.widths();
        for row in &self.rows {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let fill = widths[i].saturating_sub(measure_text_width(cell));
                    line.extend(std::iter::repeat(' ').take(fill));
                }
            }
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &Table) -> String {
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_short_cells_use_min_width() {
        let mut table = Table::new();
        table.row(["a", "b", "c"]);
        assert_eq!(render(&table), "a         b         c\n");
    }

    #[test]
    fn test_columns_follow_widest_cell() {
        let mut table = Table::new();
        table.row(["vendor/library", "ok"]);
        table.row([".", "fine"]);
        assert_eq!(
            render(&table),
            "vendor/library ok\n.              fine\n"
        );
    }

    #[test]
    fn test_ragged_rows() {
        let mut table = Table::new();
        table.row(["dir", "first"]);
        table.row(["dir"]);
        assert_eq!(render(&table), "dir       first\ndir\n");
    }
}

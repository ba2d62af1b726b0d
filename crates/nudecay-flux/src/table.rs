//! Plain-text flux tables.

use std::io::{BufRead, Write};

use smallvec::SmallVec;

use crate::error::FluxError;

/// One table row: energy followed by flux values.
pub type FluxRow = SmallVec<[f64; 8]>;

/// A rectangular table of numbers, one row per energy node.
///
/// Generic I/O over `BufRead`/`Write` so tests can use byte slices and
/// production code can use buffered files.
///
/// # Examples
///
/// ```
/// use nudecay_flux::FluxTable;
///
/// let text = "# E nu_mu nubar_mu\n1.0 2.0 3.0\n\n2.0 4.0 6.0\n";
/// let table = FluxTable::read_from(text.as_bytes()).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.width(), 3);
/// assert_eq!(table.rows()[1][2], 6.0);
///
/// let mut out = Vec::new();
/// table.write_to(&mut out).unwrap();
/// let again = FluxTable::read_from(out.as_slice()).unwrap();
/// assert_eq!(again, table);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxTable {
    rows: Vec<FluxRow>,
    header: Option<String>,
}

impl FluxTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a header line written before the rows.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Append a row. Every row must have the width of the first.
    pub fn push_row(&mut self, row: FluxRow) -> Result<(), FluxError> {
        if let Some(first) = self.rows.first() {
            if first.len() != row.len() {
                return Err(FluxError::RaggedRow {
                    line: self.rows.len() + 1,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// All rows in order.
    pub fn rows(&self) -> &[FluxRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns per row (energy included), or zero for an empty table.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |r| r.get(index).copied())
    }

    /// Parse whitespace-delimited rows, skipping blank and `#` lines.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, FluxError> {
        let mut table = Self::new();
        let mut width = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let row = trimmed
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>().map_err(|_| FluxError::Parse {
                        line: i + 1,
                        token: tok.to_string(),
                    })
                })
                .collect::<Result<FluxRow, _>>()?;
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(FluxError::RaggedRow {
                        line: i + 1,
                        expected: w,
                        found: row.len(),
                    })
                }
                Some(_) => {}
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Write rows as space-separated values, one per line.
    ///
    /// Values use the shortest representation that parses back to the
    /// same `f64`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), FluxError> {
        if let Some(header) = &self.header {
            writeln!(writer, "{header}")?;
        }
        for row in &self.rows {
            let mut first = true;
            for v in row {
                if !first {
                    write!(writer, " ")?;
                }
                write!(writer, "{v:e}")?;
                first = false;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

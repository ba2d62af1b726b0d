//! Error types for flux table I/O.

use std::fmt;
use std::io;

use nudecay_core::QueryError;

/// Errors that can occur while reading, writing or loading flux tables.
#[derive(Debug)]
pub enum FluxError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// A token could not be parsed as a number.
    Parse {
        /// 1-based line number in the source.
        line: usize,
        /// The unparseable token.
        token: String,
    },
    /// A row has a different number of columns than the first row.
    RaggedRow {
        /// 1-based line number in the source.
        line: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of this row.
        found: usize,
    },
    /// The table has no data rows.
    EmptyTable,
    /// Row count does not equal the number of energy nodes.
    RowCountMismatch {
        /// Rows in the table.
        rows: usize,
        /// Nodes in the energy grid.
        nodes: usize,
    },
    /// The table has fewer value columns than the layout names.
    ColumnCountMismatch {
        /// Value columns named by the layout.
        expected: usize,
        /// Value columns present in the table.
        found: usize,
    },
    /// A layout column names a flavor the system does not have.
    FlavorOutOfRange {
        /// Offending column index (0-based, excluding energy).
        column: usize,
        /// Number of flavors in the system.
        num_neu: usize,
    },
    /// A table value is NaN or infinite.
    NonFinite {
        /// Row index (0-based).
        row: usize,
        /// Column index (0-based, including energy).
        column: usize,
    },
    /// Evaluating the flux for output failed.
    Query(QueryError),
}

impl fmt::Display for FluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { line, token } => {
                write!(f, "line {line}: cannot parse '{token}' as a number")
            }
            Self::RaggedRow {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} columns, found {found}"),
            Self::EmptyTable => write!(f, "flux table has no data rows"),
            Self::RowCountMismatch { rows, nodes } => write!(
                f,
                "flux table has {rows} rows but the energy grid has {nodes} nodes"
            ),
            Self::ColumnCountMismatch { expected, found } => write!(
                f,
                "layout names {expected} flux columns but the table has {found}"
            ),
            Self::FlavorOutOfRange { column, num_neu } => write!(
                f,
                "column {column} names a flavor outside a {num_neu}-state system"
            ),
            Self::NonFinite { row, column } => {
                write!(f, "non-finite value at row {row}, column {column}")
            }
            Self::Query(e) => write!(f, "evaluation failed: {e}"),
        }
    }
}

impl std::error::Error for FluxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FluxError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<QueryError> for FluxError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

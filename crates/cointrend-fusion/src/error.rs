use thiserror::Error;

/// A single raw row rejected by a cleaner.
///
/// Rows are numbered from 1 in the order the provider delivered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("row {row}: required column '{column}' is missing")]
    Missing { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has unparsable value '{value}'")]
    Unparsable {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl MalformedRecord {
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            Self::Missing { row, .. } | Self::Unparsable { row, .. } => *row,
        }
    }

    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::Missing { column, .. } | Self::Unparsable { column, .. } => column,
        }
    }
}

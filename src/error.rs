use thiserror::Error;

/// Problems with the quote table itself. Any of these aborts the run before
/// an output table is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataFormatError {
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Row {row}: invalid {field} '{value}': {reason}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Row {row}: malformed record: {reason}")]
    MalformedRow { row: usize, reason: String },
}

impl DataFormatError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn { column: column.into() }
    }

    pub fn invalid_field(
        row: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            row,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Row number the error points at, if it is row-specific
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::MissingColumn { .. } => None,
            Self::InvalidField { row, .. } | Self::MalformedRow { row, .. } => Some(*row),
        }
    }
}

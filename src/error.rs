use thiserror::Error;

/// Errors raised by the storage, reporting and budget layers.
///
/// Missing records are not errors: lookups return `Option`, deletes return `bool`.
#[derive(Error, Debug)]
pub(crate) enum FinanceError {
    /// Malformed or out-of-range input, raised before any write happens.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A foreign key does not resolve to a live row.
    #[error("Invalid reference: {entity} {id} does not exist")]
    Reference { entity: &'static str, id: i64 },

    /// A sum of amounts does not fit in a `Decimal`.
    #[error("Amount overflow: total is too large to represent")]
    Overflow,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FinanceError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    #[cfg(test)]
    pub(crate) fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[cfg(test)]
    pub(crate) fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }
}

pub(crate) type Result<T> = std::result::Result<T, FinanceError>;

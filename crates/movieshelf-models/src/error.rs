use thiserror::Error;

/// Raised when a raw catalog record cannot become a [`crate::Movie`].
///
/// Per-record and non-fatal: batch callers skip the record and keep going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("malformed record: field `{field}` {reason}")]
    MalformedRecord { field: &'static str, reason: String },
}

impl NormalizeError {
    pub(crate) fn missing(field: &'static str) -> Self {
        NormalizeError::MalformedRecord {
            field,
            reason: "is missing".to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        NormalizeError::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }
}

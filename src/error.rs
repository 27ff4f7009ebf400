use thiserror::Error;

pub type Result<T> = std::result::Result<T, NestError>;

/// Precondition violations that abort a nesting run.
///
/// A plate that simply does not fit anywhere is not an error; it is reported
/// through [`crate::nester::NestReport::unplaced`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NestError {
    #[error("invalid plate '{label}': {reason}")]
    InvalidPlate { label: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing required column(s) {}; found columns: {}", .missing.join(", "), .found.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("could not read plate list: {0}")]
    Input(String),
}

impl From<csv::Error> for NestError {
    fn from(err: csv::Error) -> Self {
        Self::Input(err.to_string())
    }
}

impl NestError {
    pub(crate) fn invalid_plate(label: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPlate {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

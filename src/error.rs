use thiserror::Error;

/// Failures that abort a parse without producing a document.
///
/// Structural problems in the input are not errors; they are recorded as
/// [`Anomaly`](crate::Anomaly) values on the returned document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("empty input")]
    EmptyInput,
    #[error("arena allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },
    #[error("invalid utf-8 at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

impl Error {
    pub fn allocation(requested: usize) -> Self {
        Error::AllocationFailure { requested }
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        }
    }
}

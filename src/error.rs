use thiserror::Error;

/// Errors raised by the calculator's local operations.
///
/// Validation variants carry the message shown to the user; the remaining
/// variants come from the local store.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Please assign grades to all courses before saving.")]
    UngradedCourses { ungraded: usize },

    #[error("Please select at least one course before saving.")]
    EmptySelection,

    #[error("Please select a level and a semester before saving.")]
    TermNotSelected,

    #[error("Please save at least one semester GPA first.")]
    NoSavedSemesters,

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    // True for errors caused by user input rather than the environment.
    pub fn is_validation(&self) -> bool {
        !matches!(self, LedgerError::Io(_) | LedgerError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

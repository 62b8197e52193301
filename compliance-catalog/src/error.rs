use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Unknown framework: {0}")]
    UnknownFramework(String),

    #[error("Question index {index} out of range ({len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("Checklist already completed by {0}")]
    AlreadyCompleted(String),

    #[error("Checklist incomplete: {0} unanswered questions")]
    Incomplete(usize),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

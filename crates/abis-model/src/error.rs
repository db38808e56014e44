use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("schema field name must not be empty (position {position})")]
    EmptyFieldName { position: usize },
    #[error("schema contains duplicate field name: {name}")]
    DuplicateField { name: String },
    #[error("unknown error kind: {0}")]
    UnknownErrorKind(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

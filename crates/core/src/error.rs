use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Strategy node not found: {0}")]
    NodeNotFound(String),

    #[error("Strategy edge index out of range: {0}")]
    EdgeNotFound(usize),

    #[error("Edge {from} -> {to} references an unknown node")]
    DanglingEdge { from: String, to: String },

    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

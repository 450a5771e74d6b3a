use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("invalid numeric input {input:?}: expected a non-empty string of decimal digits")]
    InvalidNumericInput { input: String },

    #[error("at least 2 distinct points are required (got={found})")]
    InsufficientPoints { found: usize },

    #[error("point id {id} is used more than once")]
    DuplicatePointId { id: usize },

    #[error("point {id} has a non-finite coordinate")]
    NonFinitePoint { id: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

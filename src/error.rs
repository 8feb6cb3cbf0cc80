use thiserror::Error;

#[derive(Error, Debug)]
pub enum PnlError {
    #[error("Invalid month index {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid month series for {entity}: expected 12 months, got {len}")]
    InvalidSeriesLength { entity: String, len: usize },

    #[error("Validation failed for {entity}: {details}")]
    ValidationError { entity: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PnlError>;

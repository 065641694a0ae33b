use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Batch too large: {len} transactions, maximum {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Transaction '{transaction_id}' has unparseable timestamp '{raw}'")]
    InvalidTimestamp { transaction_id: String, raw: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// True for errors the caller can fix by changing the request
    /// (the boundary's validation class, as opposed to analysis failure).
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::BatchTooLarge { .. })
    }
}

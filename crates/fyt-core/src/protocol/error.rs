use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("protocol does not match schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("invalid duration string: {value:?}")]
    InvalidDuration { value: String },
}

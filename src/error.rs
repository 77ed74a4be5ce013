use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
}

pub type Result<T> = std::result::Result<T, StyleError>;

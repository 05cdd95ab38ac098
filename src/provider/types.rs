use thiserror::Error;

/// Language model provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Secret not found: {0}")]
    SecretNotFound(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

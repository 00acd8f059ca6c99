use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding failures are split into `TokenExpired` and `InvalidToken` for
/// diagnostics only; callers should treat both as an authentication failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}

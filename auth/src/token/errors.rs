use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures collapse into two kinds. Anything that stops the
/// signature from checking out (tampering, wrong key, garbled encoding) is
/// `InvalidSignature`; a genuine token past its expiry is `Expired`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,
}

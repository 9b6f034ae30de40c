use thiserror::Error;

/// Error type for password operations.
///
/// Verification never produces an error: a record that cannot be parsed is
/// reported as a mismatch.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Invalid hashing parameters: {0}")]
    InvalidParameters(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

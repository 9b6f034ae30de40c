use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::password::HashingParams;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::TokenError;
use crate::token::TokenIssuer;

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds no per-request state; share it behind an `Arc` and call it from as
/// many tasks as needed. Hashing and verification are CPU-bound, so async
/// callers should run them on a blocking pool.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult<T> {
    /// Signed bearer token
    pub access_token: String,
    /// Claims embedded in `access_token`
    pub claims: Claims<T>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator with default hashing cost.
    ///
    /// # Arguments
    /// * `token_secret` - HMAC key for signing tokens
    /// * `token_ttl` - lifetime of issued tokens
    pub fn new(token_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(token_secret, token_ttl),
        }
    }

    /// Create an authenticator with explicit Argon2 cost parameters.
    ///
    /// # Errors
    /// * `InvalidParameters` - Argon2 rejected the parameters
    pub fn with_hashing_params(
        token_secret: &[u8],
        token_ttl: Duration,
        params: HashingParams,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            password_hasher: PasswordHasher::with_params(params)?,
            token_issuer: TokenIssuer::new(token_secret, token_ttl),
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 could not derive the hash
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash record.
    ///
    /// Pass `None` when no account matched the login handle: a decoy
    /// verification still runs, so a miss costs the same as a wrong password.
    /// Corrupt records verify as `false`.
    pub fn verify_password(&self, password: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => self.password_hasher.verify_decoy(password),
        }
    }

    /// Verify credentials and mint a token on success.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored hash record
    /// * `subject` - Token subject
    /// * `private` - Private claims to embed
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the record
    /// * `Token` - Token generation failed
    pub fn authenticate<T: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        private: T,
    ) -> Result<AuthenticationResult<T>, AuthenticationError> {
        if !self.verify_password(password, Some(stored_hash)) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.generate_token(subject, private)?)
    }

    /// Mint a token without password verification.
    ///
    /// For flows where the caller has just established the identity by other
    /// means, such as a registration that was committed a moment ago.
    ///
    /// # Errors
    /// * `EncodingFailed` - token generation failed
    pub fn generate_token<T: Serialize>(
        &self,
        subject: &str,
        private: T,
    ) -> Result<AuthenticationResult<T>, TokenError> {
        let (access_token, claims) = self.token_issuer.issue(subject, private)?;
        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - token was not signed with this key or was altered
    /// * `Expired` - token lifetime has elapsed
    pub fn validate_token<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, TokenError> {
        self.token_issuer.verify(token)
    }
}

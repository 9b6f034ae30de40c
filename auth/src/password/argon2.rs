use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Cost parameters for Argon2id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashingParams {
    /// OWASP baseline for Argon2id: 19 MiB, 2 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Salted, memory-hard password hashing (Argon2id).
///
/// Hash records are PHC strings, so the salt and cost parameters travel with
/// the record and verification re-derives with whatever the record says.
/// Records hashed under older parameters keep verifying after a cost change.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    decoy: OnceLock<String>,
}

impl PasswordHasher {
    /// Create a hasher with the default cost parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            decoy: OnceLock::new(),
        }
    }

    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    /// * `InvalidParameters` - Argon2 rejected the parameter combination
    pub fn with_params(params: HashingParams) -> Result<Self, PasswordError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: OnceLock::new(),
        })
    }

    /// Hash a plaintext password with a freshly generated salt.
    ///
    /// # Returns
    /// PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`)
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 could not derive the hash
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored hash record.
    ///
    /// The digest comparison is constant time. A record that is not a valid
    /// PHC string yields `false`, same as a wrong password.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Spend one verification worth of work against a throwaway record.
    ///
    /// Used when there is no stored record to check, so the caller's failure
    /// path costs the same as a real mismatch. Always returns `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        let decoy = self
            .decoy
            .get_or_init(|| self.hash("decoy-password").unwrap_or_default());
        let _ = self.verify(password, decoy);
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

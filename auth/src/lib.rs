//! Credential primitives shared by services
//!
//! - Password hashing (Argon2id, PHC-string records)
//! - Signed bearer tokens (HS256 JWT) with typed private claims
//! - `Authenticator`, which combines the two for login flows
//!
//! Services define their own private claim types and account models; this
//! crate only knows about secrets, hash records and signed claim sets.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1));
//! let (token, _) = issuer.issue("a@x.com", serde_json::json!({ "role": "CUSTOMER" })).unwrap();
//! let claims: Claims<serde_json::Value> = issuer.verify(&token).unwrap();
//! assert_eq!(claims.sub, "a@x.com");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and verifies HS256-signed bearer tokens.
///
/// The signing key and token lifetime are fixed at construction. Verification
/// is a local computation: no session table, no revocation.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer.
    ///
    /// # Arguments
    /// * `secret` - HMAC key; at least 32 bytes for HS256
    /// * `ttl` - lifetime of every token this issuer mints
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`, after
        // the signature has been accepted.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Mint a token for `subject` issued now.
    pub fn issue<T: Serialize>(
        &self,
        subject: &str,
        private: T,
    ) -> Result<(String, Claims<T>), TokenError> {
        self.issue_at(subject, private, Utc::now())
    }

    /// Mint a token for `subject` issued at `issued_at`.
    ///
    /// # Returns
    /// The compact token and the claims it carries
    ///
    /// # Errors
    /// * `EncodingFailed` - expiry out of range, or claims could not be
    ///   serialized or signed
    pub fn issue_at<T: Serialize>(
        &self,
        subject: &str,
        private: T,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, Claims<T>), TokenError> {
        let claims = Claims::new(subject, private, issued_at, self.ttl).ok_or_else(|| {
            TokenError::EncodingFailed("token expiry out of range".to_string())
        })?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok((token, claims))
    }

    /// Verify a token against the current time.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// The signature is checked first; a token that fails it is rejected as
    /// `InvalidSignature` whether or not it has also expired.
    ///
    /// # Errors
    /// * `InvalidSignature` - signature mismatch, wrong key or malformed token
    /// * `Expired` - `now` is at or past the token's `exp`
    pub fn verify_at<T: DeserializeOwned>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims<T>, TokenError> {
        let claims = decode::<Claims<T>>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::InvalidSignature)?
            .claims;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    struct TestClaims {
        #[serde(rename = "userId")]
        user_id: i64,
        role: String,
    }

    fn private() -> TestClaims {
        TestClaims {
            user_id: 42,
            role: "CUSTOMER".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(1));

        let (token, issued) = issuer.issue("a@x.com", private()).expect("issue");
        assert!(!token.is_empty());

        let verified: Claims<TestClaims> = issuer.verify(&token).expect("verify");
        assert_eq!(verified, issued);
        assert_eq!(verified.sub, "a@x.com");
        assert_eq!(verified.private, private());
    }

    #[test]
    fn test_issue_with_out_of_range_lifetime_fails() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(100_000_000_000));

        let result = issuer.issue("a@x.com", private());
        assert!(matches!(result, Err(TokenError::EncodingFailed(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let issuer = TokenIssuer::new(SECRET, Duration::seconds(60));
        let issued_at = Utc::now() - Duration::hours(1);

        let (token, _) = issuer
            .issue_at("a@x.com", private(), issued_at)
            .expect("issue");

        let result = issuer.verify::<TestClaims>(&token);
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_at_expiry_boundary() {
        let issuer = TokenIssuer::new(SECRET, Duration::seconds(60));
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let (token, _) = issuer
            .issue_at("a@x.com", private(), issued_at)
            .expect("issue");

        assert!(issuer
            .verify_at::<TestClaims>(&token, issued_at + Duration::seconds(59))
            .is_ok());
        assert_eq!(
            issuer.verify_at::<TestClaims>(&token, issued_at + Duration::seconds(60)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            issuer.verify_at::<TestClaims>(&token, issued_at + Duration::seconds(61)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issuer1 = TokenIssuer::new(b"secret1_at_least_32_bytes_long_key!", Duration::hours(1));
        let issuer2 = TokenIssuer::new(b"secret2_at_least_32_bytes_long_key!", Duration::hours(1));

        let (token, _) = issuer1.issue("a@x.com", private()).expect("issue");

        let result = issuer2.verify::<TestClaims>(&token);
        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let issuer1 = TokenIssuer::new(b"secret1_at_least_32_bytes_long_key!", Duration::seconds(1));
        let issuer2 = TokenIssuer::new(b"secret2_at_least_32_bytes_long_key!", Duration::seconds(1));

        let (token, _) = issuer1
            .issue_at("a@x.com", private(), Utc::now() - Duration::days(1))
            .expect("issue");

        assert_eq!(
            issuer2.verify::<TestClaims>(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_tampered_payload() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(1));
        let (token, _) = issuer.issue("a@x.com", private()).expect("issue");

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // Forge a payload claiming a different role, keep the original signature.
        let forged = TokenIssuer::new(b"attacker_key_at_least_32_bytes_long!", Duration::hours(1));
        let (forged_token, _) = forged
            .issue(
                "a@x.com",
                TestClaims {
                    user_id: 42,
                    role: "ADMIN".to_string(),
                },
            )
            .expect("issue");
        let forged_payload = forged_token.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            issuer.verify::<TestClaims>(&spliced),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_any_flipped_byte() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(1));
        let (token, _) = issuer.issue("a@x.com", private()).expect("issue");
        let bytes = token.as_bytes();

        // One position in each of header, payload and signature.
        let signature_start = token.rfind('.').unwrap() + 1;
        for index in [3, token.find('.').unwrap() + 5, signature_start + 3] {
            let mut tampered = bytes.to_vec();
            tampered[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(tampered).unwrap();

            assert_eq!(
                issuer.verify::<TestClaims>(&tampered),
                Err(TokenError::InvalidSignature),
                "byte {} altered",
                index
            );
        }
    }

    #[test]
    fn test_verify_garbage() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(1));

        assert_eq!(
            issuer.verify::<TestClaims>("invalid.token.here"),
            Err(TokenError::InvalidSignature)
        );
        assert_eq!(
            issuer.verify::<TestClaims>(""),
            Err(TokenError::InvalidSignature)
        );
    }
}

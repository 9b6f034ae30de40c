use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Signed token payload.
///
/// Carries the registered `sub`, `iat` and `exp` claims plus a service-defined
/// private claim set `T`, which is flattened into the top-level JSON object.
/// Every field is covered by the signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims<T> {
    /// Subject (the principal the token speaks for)
    pub sub: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Private claims
    #[serde(flatten)]
    pub private: T,
}

impl<T> Claims<T> {
    /// Build claims issued at `issued_at` and valid for `ttl`.
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn new(
        subject: impl Into<String>,
        private: T,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;

        Some(Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            private,
        })
    }

    /// A token is live while `now < exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    struct Private {
        #[serde(rename = "userId")]
        user_id: i64,
        role: String,
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn test_new_sets_expiry_from_ttl() {
        let claims = Claims::new("a@x.com", (), at(1_000), Duration::hours(24)).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.expires_at(), Some(at(1_000 + 24 * 60 * 60)));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new("a@x.com", (), at(900), Duration::seconds(100)).unwrap();

        assert!(!claims.is_expired(at(999)));
        assert!(claims.is_expired(at(1000))); // exactly at expiration
        assert!(claims.is_expired(at(1001)));
    }

    #[test]
    fn test_private_claims_are_flattened() {
        let claims = Claims::new(
            "a@x.com",
            Private {
                user_id: 7,
                role: "CUSTOMER".to_string(),
            },
            at(1_000),
            Duration::seconds(60),
        )
        .unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "a@x.com");
        assert_eq!(json["userId"], 7);
        assert_eq!(json["role"], "CUSTOMER");
        assert_eq!(json["exp"], 1_060);
        assert!(json.get("private").is_none());
    }

    #[test]
    fn test_new_rejects_out_of_range_expiry() {
        let claims = Claims::new("a@x.com", (), at(1_000), Duration::hours(100_000_000_000));

        assert!(claims.is_none());
    }
}

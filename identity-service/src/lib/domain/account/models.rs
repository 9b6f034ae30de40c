use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::FullNameError;
use crate::domain::account::errors::PasswordPolicyError;
use crate::domain::account::errors::PhoneNumberError;
use crate::domain::account::errors::RoleError;

/// Account aggregate entity.
///
/// The durable identity record. Only registration creates one; only the
/// profile path changes `full_name` and `phone`; nothing here changes `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub full_name: FullName,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// An account that has not been saved yet and so has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub full_name: FullName,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            phone: self.phone,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Account unique identifier, assigned by the store on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed and case-folded to lowercase on construction, so `Ann@X.com` and
/// `ann@x.com` name the same account. Format is checked with an RFC 5322
/// parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `Empty` - Blank input
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name type
///
/// Non-blank after trimming, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    const MAX_LENGTH: usize = 255;

    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooLong` - Longer than 255 characters
    pub fn new(full_name: impl AsRef<str>) -> Result<Self, FullNameError> {
        let trimmed = full_name.as_ref().trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(FullNameError::Blank)
        } else if length > Self::MAX_LENGTH {
            Err(FullNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Contact phone, free-form but bounded to the stored column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MAX_LENGTH: usize = 32;

    /// # Errors
    /// * `TooLong` - Longer than 32 characters
    pub fn new(phone: impl AsRef<str>) -> Result<Self, PhoneNumberError> {
        let trimmed = phone.as_ref().trim();
        let length = trimmed.chars().count();

        if length > Self::MAX_LENGTH {
            return Err(PhoneNumberError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Plaintext password accepted at registration.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored hash record (PHC string).
///
/// Not `Serialize`: it only ever travels between the store and the hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(record: String) -> Self {
        Self(record)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            other => Err(RoleError(other.to_string())),
        }
    }
}

/// Private claims carried in every identity token, next to `sub` (the email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    #[serde(rename = "userId")]
    pub account_id: AccountId,
    pub role: Role,
}

impl From<&Account> for AccountClaims {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            role: account.role,
        }
    }
}

/// Verified token payload: subject email, account id, role, `iat`, `exp`.
pub type IdentityClaims = auth::Claims<AccountClaims>;

/// Value returned by a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    pub token: String,
    pub account_id: AccountId,
    pub email: EmailAddress,
    pub full_name: FullName,
    pub role: Role,
}

impl IdentityAssertion {
    pub fn new(token: String, account: &Account) -> Self {
        Self {
            token,
            account_id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
        }
    }
}

/// Public projection of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub id: AccountId,
    pub email: EmailAddress,
    pub full_name: FullName,
    pub role: Role,
    pub phone: Option<String>,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            phone: account.phone.clone(),
        }
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub full_name: FullName,
    pub phone: Option<PhoneNumber>,
}

impl RegisterCommand {
    pub fn new(
        email: EmailAddress,
        password: Password,
        full_name: FullName,
        phone: Option<PhoneNumber>,
    ) -> Self {
        Self {
            email,
            password,
            full_name,
            phone,
        }
    }
}

/// Command to authenticate with an email/password pair.
///
/// The password is not held to the registration policy here: a login attempt
/// is only ever checked against the stored hash.
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Command to update profile fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub full_name: Option<FullName>,
    pub phone: Option<PhoneNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_case_folded_and_trimmed() {
        let email = EmailAddress::new("  Ann.B@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ann.b@example.com");
        assert_eq!(email, EmailAddress::new("ann.b@example.com").unwrap());
    }

    #[test]
    fn test_email_rejects_bad_input() {
        assert_eq!(EmailAddress::new("   "), Err(EmailError::Empty));
        assert!(matches!(
            EmailAddress::new("not-an-email"),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_full_name_rules() {
        assert_eq!(FullName::new(" Ann ").unwrap().as_str(), "Ann");
        assert_eq!(FullName::new("  "), Err(FullNameError::Blank));
        assert_eq!(
            FullName::new("x".repeat(256)),
            Err(FullNameError::TooLong {
                max: 255,
                actual: 256
            })
        );
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("secret1".to_string()).is_ok());
        assert_eq!(
            Password::new("short".to_string()).unwrap_err(),
            PasswordPolicyError::TooShort { min: 6 }
        );
        assert_eq!(
            Password::new("      ".to_string()).unwrap_err(),
            PasswordPolicyError::Blank
        );
        assert_eq!(
            Password::new(String::new()).unwrap_err(),
            PasswordPolicyError::Blank
        );
    }

    #[test]
    fn test_phone_number_length() {
        assert_eq!(
            PhoneNumber::new(" +1 555 0100 ").unwrap().as_str(),
            "+1 555 0100"
        );
        assert!(PhoneNumber::new("1".repeat(32)).is_ok());
        assert_eq!(
            PhoneNumber::new("1".repeat(33)),
            Err(PhoneNumberError::TooLong {
                max: 32,
                actual: 33
            })
        );
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let password = Password::new("hunter22".to_string()).unwrap();
        let hash = PasswordHash::new("$argon2id$v=19$secret".to_string());
        let login = LoginCommand {
            email: EmailAddress::new("a@x.com").unwrap(),
            password: "hunter22".to_string(),
        };

        assert!(!format!("{:?}", password).contains("hunter22"));
        assert!(!format!("{:?}", hash).contains("argon2id"));
        assert!(!format!("{:?}", login).contains("hunter22"));
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        for role in [Role::Customer, Role::Admin, Role::Staff] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(Role::default(), Role::Customer);
        assert!("ROOT".parse::<Role>().is_err());
    }

    #[test]
    fn test_account_claims_wire_names() {
        let claims = AccountClaims {
            account_id: AccountId(7),
            role: Role::Staff,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json, serde_json::json!({ "userId": 7, "role": "STAFF" }));
    }
}

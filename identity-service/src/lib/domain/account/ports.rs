use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::IdentityAssertion;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::UpdateProfileCommand;

/// Port for the credential lifecycle operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new account and sign it in.
    ///
    /// # Arguments
    /// * `command` - Validated email, password, full name and optional phone
    ///
    /// # Returns
    /// Token plus public account fields; the account gets the default role
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Storage` - Persistence failed
    async fn register(&self, command: RegisterCommand) -> Result<IdentityAssertion, AccountError>;

    /// Authenticate an email/password pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Storage` - Persistence failed
    async fn login(&self, command: LoginCommand) -> Result<IdentityAssertion, AccountError>;

    /// Fetch the public profile of an account.
    ///
    /// # Errors
    /// * `AccountNotFound` - No account with this id
    /// * `Storage` - Persistence failed
    async fn fetch_profile(&self, id: AccountId) -> Result<AccountProfile, AccountError>;

    /// Apply a partial profile update.
    ///
    /// Fields absent from `command` keep their stored values.
    ///
    /// # Errors
    /// * `AccountNotFound` - No account with this id
    /// * `Storage` - Persistence failed
    async fn update_profile(
        &self,
        id: AccountId,
        command: UpdateProfileCommand,
    ) -> Result<AccountProfile, AccountError>;
}

/// Persistence operations the engine needs from a credential store.
///
/// Calls return the latest committed state. Implementations must enforce
/// email uniqueness at write time; the engine's own existence check is only a
/// fast path and races with concurrent registrations.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Whether any account uses this email.
    ///
    /// # Errors
    /// * `Storage` - Persistence failed
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError>;

    /// Retrieve account by email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Persistence failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Persistence failed
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountError>;

    /// First save of an account; the store assigns its id.
    ///
    /// # Returns
    /// The persisted account
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Storage` - Persistence failed
    async fn save(&self, account: NewAccount) -> Result<Account, AccountError>;

    /// Persist changes to an existing account.
    ///
    /// # Returns
    /// The persisted account
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    /// * `Storage` - Persistence failed
    async fn update(&self, account: Account) -> Result<Account, AccountError>;
}

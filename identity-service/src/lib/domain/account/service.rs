use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountClaims;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::IdentityAssertion;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::Password;
use crate::domain::account::models::PasswordHash;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Role;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::IdentityServicePort;

/// Credential lifecycle engine.
///
/// Stateless between calls: accounts are read from the repository for the
/// duration of one operation and never cached. Argon2 work runs on the
/// blocking pool so it cannot stall the async executor.
pub struct IdentityService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> IdentityService<AR>
where
    AR: AccountRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<PasswordHash, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| AccountError::Credential(e.to_string()))?
            .map(PasswordHash::new)
            .map_err(|e| AccountError::Credential(e.to_string()))
    }

    fn issue_token(&self, account: &Account) -> Result<String, AccountError> {
        self.authenticator
            .generate_token(account.email.as_str(), AccountClaims::from(account))
            .map(|result| result.access_token)
            .map_err(|e| AccountError::Credential(e.to_string()))
    }

    async fn find_existing(&self, id: AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::AccountNotFound(id))
    }
}

#[async_trait]
impl<AR> IdentityServicePort for IdentityService<AR>
where
    AR: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<IdentityAssertion, AccountError> {
        if self.repository.exists_by_email(&command.email).await? {
            tracing::info!(email = %command.email, "Registration rejected: email already registered");
            return Err(AccountError::DuplicateAccount(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let account = NewAccount {
            email: command.email,
            password_hash,
            full_name: command.full_name,
            phone: command.phone.map(PhoneNumber::into_inner),
            role: Role::default(),
            created_at: Utc::now(),
        };

        // The store re-checks uniqueness on write, which settles concurrent
        // registrations that both passed the check above.
        let account = self.repository.save(account).await?;
        let token = self.issue_token(&account)?;

        tracing::info!(
            account_id = %account.id,
            role = %account.role,
            "Account registered"
        );

        Ok(IdentityAssertion::new(token, &account))
    }

    async fn login(&self, command: LoginCommand) -> Result<IdentityAssertion, AccountError> {
        let account = self.repository.find_by_email(&command.email).await?;
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;

        let Some(account) = account else {
            tokio::task::spawn_blocking(move || authenticator.verify_password(&password, None))
                .await
                .map_err(|e| AccountError::Credential(e.to_string()))?;

            tracing::info!(email = %command.email, "Login rejected");
            return Err(AccountError::InvalidCredentials);
        };

        let (account, result) = tokio::task::spawn_blocking(move || {
            let result = authenticator.authenticate(
                &password,
                account.password_hash.as_str(),
                account.email.as_str(),
                AccountClaims::from(&account),
            );
            (account, result)
        })
        .await
        .map_err(|e| AccountError::Credential(e.to_string()))?;

        match result {
            Ok(result) => {
                tracing::info!(account_id = %account.id, "Login succeeded");
                Ok(IdentityAssertion::new(result.access_token, &account))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(email = %command.email, "Login rejected");
                Err(AccountError::InvalidCredentials)
            }
            Err(AuthenticationError::Token(e)) => Err(AccountError::Credential(e.to_string())),
        }
    }

    async fn fetch_profile(&self, id: AccountId) -> Result<AccountProfile, AccountError> {
        let account = self.find_existing(id).await?;
        Ok(AccountProfile::from(&account))
    }

    async fn update_profile(
        &self,
        id: AccountId,
        command: UpdateProfileCommand,
    ) -> Result<AccountProfile, AccountError> {
        let mut account = self.find_existing(id).await?;

        if let Some(full_name) = command.full_name {
            account.full_name = full_name;
        }

        if let Some(phone) = command.phone {
            account.phone = Some(phone.into_inner());
        }

        let account = self.repository.update(account).await?;
        tracing::info!(account_id = %account.id, "Profile updated");

        Ok(AccountProfile::from(&account))
    }
}

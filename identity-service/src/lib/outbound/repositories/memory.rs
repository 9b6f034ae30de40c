use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewAccount;
use crate::domain::account::ports::AccountRepository;

/// Process-local credential store.
///
/// Ids are assigned sequentially from 1. Email uniqueness is checked under
/// the same lock as the insert, so concurrent registrations of one address
/// cannot both succeed.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    accounts: BTreeMap<AccountId, Account>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, AccountError> {
        self.state
            .lock()
            .map_err(|_| AccountError::Storage("account store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        let state = self.lock()?;
        Ok(state.accounts.values().any(|a| &a.email == email))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        let state = self.lock()?;
        Ok(state.accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountError> {
        let state = self.lock()?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn save(&self, account: NewAccount) -> Result<Account, AccountError> {
        let mut state = self.lock()?;

        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::DuplicateAccount(account.email.to_string()));
        }

        state.next_id += 1;
        let account = account.with_id(AccountId(state.next_id));
        state.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let mut state = self.lock()?;

        if state
            .accounts
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(AccountError::DuplicateAccount(account.email.to_string()));
        }

        match state.accounts.get_mut(&account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(account)
            }
            None => Err(AccountError::AccountNotFound(account.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::account::models::FullName;
    use crate::domain::account::models::PasswordHash;
    use crate::domain::account::models::Role;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: EmailAddress::new(email).unwrap(),
            password_hash: PasswordHash::new("$argon2id$test_hash".to_string()),
            full_name: FullName::new("Ann").unwrap(),
            phone: None,
            role: Role::Customer,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repository = InMemoryAccountRepository::new();

        let first = repository.save(new_account("a@x.com")).await.unwrap();
        let second = repository.save(new_account("b@x.com")).await.unwrap();

        assert_eq!(first.id, AccountId(1));
        assert_eq!(second.id, AccountId(2));
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let repository = InMemoryAccountRepository::new();

        repository.save(new_account("a@x.com")).await.unwrap();
        let result = repository.save(new_account("A@X.com")).await;

        assert!(matches!(result, Err(AccountError::DuplicateAccount(_))));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_saves_admit_one() {
        let repository = Arc::new(InMemoryAccountRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.save(new_account("a@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let repository = InMemoryAccountRepository::new();
        let saved = repository.save(new_account("a@x.com")).await.unwrap();
        let email = EmailAddress::new("a@x.com").unwrap();
        let other = EmailAddress::new("z@x.com").unwrap();

        assert!(repository.exists_by_email(&email).await.unwrap());
        assert!(!repository.exists_by_email(&other).await.unwrap());
        assert_eq!(repository.find_by_email(&email).await.unwrap(), Some(saved.clone()));
        assert_eq!(repository.find_by_email(&other).await.unwrap(), None);
        assert_eq!(repository.find_by_id(saved.id).await.unwrap(), Some(saved));
        assert_eq!(repository.find_by_id(AccountId(42)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let repository = InMemoryAccountRepository::new();
        let mut account = repository.save(new_account("a@x.com")).await.unwrap();

        account.phone = Some("555-0100".to_string());
        repository.update(account.clone()).await.unwrap();

        let stored = repository.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let repository = InMemoryAccountRepository::new();
        let account = new_account("a@x.com").with_id(AccountId(9));

        let result = repository.update(account).await;
        assert!(matches!(
            result,
            Err(AccountError::AccountNotFound(AccountId(9)))
        ));
    }
}

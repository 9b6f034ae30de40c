use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::FullName;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::PasswordHash;
use crate::domain::account::ports::AccountRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    full_name: String,
    phone: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: PasswordHash::new(row.password_hash),
            full_name: FullName::new(row.full_name)?,
            phone: row.phone,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

fn storage_error(e: sqlx::Error) -> AccountError {
    AccountError::Storage(e.to_string())
}

fn is_duplicate_email(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| {
            db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        })
        .unwrap_or(false)
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)
            "#,
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, full_name, phone, role, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(Account::try_from)
        .transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, full_name, phone, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(Account::try_from)
        .transpose()
    }

    async fn save(&self, account: NewAccount) -> Result<Account, AccountError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (email, password_hash, full_name, phone, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(account.email.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.full_name.as_str())
        .bind(account.phone.as_deref())
        .bind(account.role.as_str())
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_email(&e) {
                AccountError::DuplicateAccount(account.email.to_string())
            } else {
                storage_error(e)
            }
        })?;

        Ok(account.with_id(AccountId(id)))
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, password_hash = $3, full_name = $4, phone = $5, role = $6
            WHERE id = $1
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.full_name.as_str())
        .bind(account.phone.as_deref())
        .bind(account.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_email(&e) {
                AccountError::DuplicateAccount(account.email.to_string())
            } else {
                storage_error(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::AccountNotFound(account.id));
        }

        Ok(account)
    }
}

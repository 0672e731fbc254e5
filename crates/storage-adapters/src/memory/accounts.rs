use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{Account, AccountRepository, DomainError, DomainResult};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    accounts: DashMap<Uuid, Account>,
    /// Lowercased email → id. Claiming an entry here is what makes an email
    /// taken, so two concurrent sign-ups cannot both succeed. An id only
    /// appears here once its record is in `accounts`.
    by_email: DashMap<String, Uuid>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: Account) -> DomainResult<Account> {
        let key = account.email.to_lowercase();
        match self.by_email.entry(key) {
            Entry::Occupied(_) => Err(DomainError::conflict(format!(
                "An account with email {} already exists",
                account.email
            ))),
            Entry::Vacant(slot) => {
                self.accounts.insert(account.id, account.clone());
                slot.insert(account.id);
                tracing::debug!(account_id = %account.id, "account stored");
                Ok(account)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let id = match self.by_email.get(&email.to_lowercase()) {
            Some(id) => *id,
            None => return Ok(None),
        };
        self.find_by_id(id).await
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Account> {
        let mut account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User no longer exists."))?;
        account.password_hash = password_hash;
        account.updated_at = updated_at;
        Ok(account.clone())
    }
}

//! In-memory `UserRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserAccount, UserId};

#[derive(Default)]
struct Accounts {
    by_id: HashMap<UserId, UserAccount>,
    ids_by_email: HashMap<Email, UserId>,
}

/// `UserRepository` backed by a process-local map.
///
/// Email uniqueness is checked under the write lock, mirroring the unique
/// index of the PostgreSQL adapter.
#[derive(Default)]
pub struct MemoryUserRepository {
    accounts: RwLock<Accounts>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        let email = account.user.email();
        if accounts.ids_by_email.contains_key(email) {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        let id = account.user.id().clone();
        accounts.ids_by_email.insert(email.clone(), id.clone());
        accounts.by_id.insert(id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_id.get(id).map(|account| account.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .ids_by_email
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| accounts.by_id.get(id))
            .map(|account| account.user.clone())
            .collect())
    }
}

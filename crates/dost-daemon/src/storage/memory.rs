//! In-memory storage implementation

use super::traits::*;
use crate::error::StorageError;
use crate::model::{normalize_email, User};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory storage for development and testing
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    users: RwLock<UserTable>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStorage for InMemoryStorage {
    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn insert_user(&self, user: User) -> StorageResult<()> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&user.email) {
            return Err(StorageError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }
        users.by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(email, "hash".to_string(), "Test", None)
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let storage = InMemoryStorage::new();
        let ada = user("ada@example.com");
        let id = ada.id;

        storage.insert_user(ada).await.unwrap();

        let by_email = storage.get_user_by_email("ADA@example.com ").await.unwrap();
        assert_eq!(by_email.unwrap().id, id);
        assert!(storage
            .get_user_by_email("bob@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let storage = InMemoryStorage::new();
        storage.insert_user(user("ada@example.com")).await.unwrap();

        let err = storage
            .insert_user(user("Ada@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(storage.users.read().await.by_id.len(), 1);
    }
}

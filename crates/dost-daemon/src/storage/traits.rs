//! Storage trait definitions

use crate::error::StorageError;
use crate::model::User;
use async_trait::async_trait;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Combined storage trait
pub trait Storage: UserStorage + Send + Sync {}

impl<T: UserStorage + Send + Sync> Storage for T {}

/// Storage for user accounts
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Get a user by normalized email
    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Insert a new user; fails with `Conflict` when the email is taken
    async fn insert_user(&self, user: User) -> StorageResult<()>;
}

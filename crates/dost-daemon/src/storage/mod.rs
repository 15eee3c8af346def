//! Storage layer for dost-daemon
//!
//! Accounts live for the lifetime of the process.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{Storage, StorageResult, UserStorage};

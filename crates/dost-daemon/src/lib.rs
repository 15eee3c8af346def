//! Dost daemon library
//!
//! This module provides the core components for the Dost daemon:
//! - REST API handlers
//! - Bearer-token authentication
//! - Account storage
//! - Assistant and collaboration backends
//! - Server lifecycle management

pub mod api;
pub mod assistant;
pub mod auth;
pub mod collab;
pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod storage;

pub use api::create_router;
pub use api::rest::state::AppState;
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use server::Server;
pub use storage::{InMemoryStorage, Storage};

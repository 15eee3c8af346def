//! API request handlers

mod assistant;
mod auth;
mod collab;
mod execute;
mod health;

pub use assistant::*;
pub use auth::*;
pub use collab::*;
pub use execute::*;
pub use health::*;

//! Authentication: signed bearer tokens and bcrypt password hashes

mod extract;
mod password;
mod token;

pub use extract::AuthUser;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

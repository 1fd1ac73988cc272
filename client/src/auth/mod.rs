//! Authentication module
//!
//! Demo-grade account directory with argon2 password hashing.

mod directory;
mod password;

pub use directory::{avatar_initials, Account, AccountDirectory};
pub use password::PasswordService;

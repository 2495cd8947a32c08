/// Security utilities: password hashing and JWT handling
pub mod jwt;
pub mod password;

pub use password::{hash_password, verify_password};

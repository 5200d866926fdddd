//! Password hashing and bearer-token generation.

pub mod password;
pub mod token;

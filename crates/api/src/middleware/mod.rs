//! Request extractors and authentication checks shared by handlers.

pub mod auth;

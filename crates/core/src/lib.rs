//! Domain types shared across the Imagia workspace.

pub mod error;
pub mod plan;
pub mod types;
pub mod verification;

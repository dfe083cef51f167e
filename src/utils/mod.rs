//! Shared utilities

pub mod error;
pub mod generator;
pub mod validation;

pub use error::{AppError, AppResult, ErrorResponse};
pub use generator::generate_unique_alphanumeric_id;

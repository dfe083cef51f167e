//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure including:
//! - Test fixtures
//! - A mock user profile service
//! - Test database setup

#![allow(dead_code)]

pub mod mocks;
pub mod test_db;

pub use fixtures::*;
pub use mocks::*;
pub use test_db::*;

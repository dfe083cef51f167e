//! Database layer
//!
//! SQLite storage for organisations and their owned sub-entities:
//! - Organisations
//! - Professional users, their role attributes and payment account mappings
//! - Payment accounts
//! - Contact information and DX addresses
//!
//! Repositories borrow a single `SqliteConnection` so the same code runs against
//! a pooled connection for reads and inside a transaction for writes.

pub mod contact_information_repository;
pub mod organisation_repository;
pub mod payment_account_repository;
pub mod professional_user_repository;

pub use contact_information_repository::ContactInformationRepository;
pub use organisation_repository::OrganisationRepository;
pub use payment_account_repository::PaymentAccountRepository;
pub use professional_user_repository::ProfessionalUserRepository;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::utils::{AppError, AppResult};

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and apply migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Build `?, ?, ?` for an IN clause of `count` values
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub(crate) fn parse_db_timestamp(ts: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .map_err(|e| AppError::Database(format!("Invalid stored timestamp '{}': {}", ts, e)))
}

pub(crate) fn parse_db_uuid(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id)
        .map_err(|e| AppError::Database(format!("Invalid stored id '{}': {}", id, e)))
}

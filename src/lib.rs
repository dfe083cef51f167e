//! Professional Reference Data
//!
//! Organisation management for the professional reference data platform:
//! registration of organisations with their super user, payment accounts and
//! contact details, retrieval reconciled against the user profile service, and
//! the guarded deletion workflow.

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use services::{OrganisationService, UserProfileClient, UserProfileGateway};
pub use utils::{AppError, AppResult};

/// Application state shared by the entry points
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
    /// Organisation lifecycle service
    pub organisations: Arc<OrganisationService>,
}

impl AppState {
    /// Wire the services against an initialized pool and the HTTP user profile client
    pub fn new(config: AppConfig, db: DbPool) -> AppResult<Self> {
        let gateway: Arc<dyn UserProfileGateway> =
            Arc::new(UserProfileClient::new(&config.user_profile)?);
        let organisations = Arc::new(OrganisationService::new(
            db.clone(),
            gateway,
            &config.organisation,
        ));

        Ok(Self {
            config,
            db,
            organisations,
        })
    }
}

//! Test database and service setup
//!
//! Each test gets its own temporary SQLite file with migrations applied and
//! an organisation service wired to a mock user profile service.

use std::sync::Arc;

use uuid::Uuid;

use professional_refdata::config::{DatabaseConfig, OrganisationConfig};
use professional_refdata::db::{self, DbPool};
use professional_refdata::models::{Organisation, OrganisationCreationRequest};
use professional_refdata::services::{IdentifierGenerator, OrganisationService};

use super::fixtures::update_request;
use super::mocks::MockUserProfileGateway;

pub struct TestContext {
    pub pool: DbPool,
    pub gateway: Arc<MockUserProfileGateway>,
    pub service: OrganisationService,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_database(test_database_config()).await
    }

    /// Context whose pool allows several concurrent connections
    pub async fn with_max_connections(max_connections: u32) -> Self {
        Self::with_database(DatabaseConfig {
            max_connections,
            ..test_database_config()
        })
        .await
    }

    async fn with_database(config: DatabaseConfig) -> Self {
        let pool = db::init_pool(&config)
            .await
            .expect("Failed to initialize test database");
        let gateway = Arc::new(MockUserProfileGateway::new());
        let service = OrganisationService::new(
            pool.clone(),
            gateway.clone(),
            &OrganisationConfig::default(),
        );

        Self {
            pool,
            gateway,
            service,
        }
    }

    pub async fn with_identifier_generator(generator: IdentifierGenerator) -> Self {
        let context = Self::new().await;
        Self {
            service: context.service.with_identifier_generator(generator),
            ..context
        }
    }

    /// Create an organisation and return it as stored
    pub async fn create(&self, request: &OrganisationCreationRequest) -> Organisation {
        let response = self
            .service
            .create_organisation(request)
            .await
            .expect("Failed to create organisation");
        self.stored(&response.organisation_identifier).await
    }

    /// Create an organisation and activate it, registering its super user
    pub async fn create_active(&self, request: &OrganisationCreationRequest) -> Organisation {
        let created = self.create(request).await;
        self.service
            .update_organisation(
                &update_request(request, "ACTIVE"),
                &created.organisation_identifier,
            )
            .await
            .expect("Failed to activate organisation");
        self.gateway.clear_calls();
        self.stored(&created.organisation_identifier).await
    }

    pub async fn stored(&self, organisation_identifier: &str) -> Organisation {
        self.service
            .get_organisation_by_identifier(organisation_identifier)
            .await
            .expect("Failed to load organisation")
            .expect("Organisation not found")
    }
}

pub fn test_database_config() -> DatabaseConfig {
    // Use a unique temp file for each test to avoid conflicts
    let db_path = format!(
        "/tmp/professional_refdata_test_{}.db",
        Uuid::new_v4().simple()
    );

    DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", db_path),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 30,
        idle_timeout_secs: 600,
    }
}

//! User profile service gateway
//!
//! The user profile service is the system of record for user identities and
//! their activation status. [`UserProfileGateway`] is the contract the
//! organisation service relies on; [`UserProfileClient`] implements it over HTTP.
//!
//! Calls are never part of a local database transaction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::UserProfileConfig;
use crate::models::{
    DeleteOrganisationResponse, DeleteUserProfilesRequest, DeleteUserProfilesResponse,
    GetUserProfilesResponse, IdamStatus, NewUserResponse, RetrieveUserProfilesRequest,
    UserProfile, UserProfileCreationRequest, UserProfileCreationResponse,
};
use crate::utils::{AppError, AppResult};

/// Operations the organisation service needs from the identity system
#[async_trait]
pub trait UserProfileGateway: Send + Sync {
    /// Fetch profiles for the given identifiers, ordered by identifier
    async fn fetch_users_by_identifiers(
        &self,
        user_identifiers: &[String],
        show_deleted: bool,
    ) -> AppResult<Vec<UserProfile>>;

    /// Identity status of the user with this email; `None` when unknown
    async fn fetch_status_by_email(&self, email: &str) -> AppResult<Option<IdamStatus>>;

    /// Delete the given profiles and report the outcome as the service saw it
    async fn delete_profiles(&self, user_identifiers: &[String])
        -> AppResult<DeleteOrganisationResponse>;

    /// Register a new user with the identity system
    async fn create_profile(
        &self,
        request: &UserProfileCreationRequest,
    ) -> AppResult<UserProfileCreationResponse>;
}

/// HTTP client for the user profile service
#[derive(Clone)]
pub struct UserProfileClient {
    client: Client,
    base_url: String,
}

impl UserProfileClient {
    pub fn new(config: &UserProfileConfig) -> AppResult<Self> {
        info!("Initializing user profile client for {}", config.url);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::user_profile(format!("Invalid response from user profile service: {}", e))
        })
    }

    async fn unexpected_status(response: reqwest::Response, operation: &str) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(
            "User profile {} failed with status {}: {}",
            operation, status, body
        );
        AppError::user_profile(format!("{} failed with status {}", operation, status))
    }
}

#[async_trait]
impl UserProfileGateway for UserProfileClient {
    async fn fetch_users_by_identifiers(
        &self,
        user_identifiers: &[String],
        show_deleted: bool,
    ) -> AppResult<Vec<UserProfile>> {
        let url = Url::parse_with_params(
            &self.url("/v1/userprofile/users"),
            &[("showdeleted", show_deleted.to_string())],
        )
        .map_err(|e| AppError::Config(format!("Invalid user profile URL: {}", e)))?;

        debug!("Retrieving {} user profiles", user_identifiers.len());

        let response = self
            .client
            .post(url)
            .json(&RetrieveUserProfilesRequest {
                user_ids: user_identifiers.to_vec(),
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: GetUserProfilesResponse = Self::parse_json(response).await?;
                let mut profiles = body.user_profiles;
                profiles.sort_by(|a, b| a.user_identifier.cmp(&b.user_identifier));
                Ok(profiles)
            }
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            _ => Err(Self::unexpected_status(response, "retrieve user profiles").await),
        }
    }

    async fn fetch_status_by_email(&self, email: &str) -> AppResult<Option<IdamStatus>> {
        let url = Url::parse_with_params(&self.url("/v1/userprofile"), &[("email", email)])
            .map_err(|e| AppError::Config(format!("Invalid user profile URL: {}", e)))?;

        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body: NewUserResponse = Self::parse_json(response).await?;
                Ok(body
                    .idam_status
                    .filter(|s| !s.trim().is_empty())
                    .and_then(|s| s.parse::<IdamStatus>().ok()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::unexpected_status(response, "find user by email").await),
        }
    }

    async fn delete_profiles(
        &self,
        user_identifiers: &[String],
    ) -> AppResult<DeleteOrganisationResponse> {
        info!("Deleting {} user profile(s)", user_identifiers.len());

        let response = self
            .client
            .delete(self.url("/v1/userprofile/users"))
            .json(&DeleteUserProfilesRequest {
                user_ids: user_identifiers.to_vec(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: DeleteUserProfilesResponse = if body.trim().is_empty() {
            DeleteUserProfilesResponse::default()
        } else {
            serde_json::from_str(&body).unwrap_or_default()
        };

        Ok(DeleteOrganisationResponse::new(
            parsed.status_code.unwrap_or(status.as_u16()),
            parsed.message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string()
            }),
        ))
    }

    async fn create_profile(
        &self,
        request: &UserProfileCreationRequest,
    ) -> AppResult<UserProfileCreationResponse> {
        let response = self
            .client
            .post(self.url("/v1/userprofile"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let mut body: UserProfileCreationResponse = Self::parse_json(response).await?;
            if body.idam_registration_response.is_none() {
                body.idam_registration_response = Some(status.as_u16());
            }
            Ok(body)
        } else {
            Err(Self::unexpected_status(response, "create user profile").await)
        }
    }
}

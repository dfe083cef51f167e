//! Mock services for testing
//!
//! Provides an in-memory user profile service that records every call so tests
//! can assert on what the organisation service asked for.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use professional_refdata::models::{
    DeleteOrganisationResponse, IdamStatus, UserProfile, UserProfileCreationRequest,
    UserProfileCreationResponse, IDAM_REGISTRATION_CREATED,
};
use professional_refdata::services::UserProfileGateway;
use professional_refdata::utils::{AppError, AppResult};

/// A call received by the mock gateway
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    FetchUsers {
        user_identifiers: Vec<String>,
        show_deleted: bool,
    },
    FetchStatus(String),
    DeleteProfiles(Vec<String>),
    CreateProfile(String),
}

/// In-memory user profile service
pub struct MockUserProfileGateway {
    profiles: RwLock<HashMap<String, UserProfile>>,
    statuses: RwLock<HashMap<String, IdamStatus>>,
    delete_response: RwLock<DeleteOrganisationResponse>,
    creation_response: RwLock<Option<UserProfileCreationResponse>>,
    creation_delay: RwLock<Option<Duration>>,
    /// Fail every call with a gateway error when set
    unavailable: RwLock<bool>,
    calls: RwLock<Vec<GatewayCall>>,
    next_id: AtomicUsize,
}

impl Default for MockUserProfileGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUserProfileGateway {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            statuses: RwLock::new(HashMap::new()),
            delete_response: RwLock::new(DeleteOrganisationResponse::deleted()),
            creation_response: RwLock::new(None),
            creation_delay: RwLock::new(None),
            unavailable: RwLock::new(false),
            calls: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn add_profile(&self, profile: UserProfile) {
        self.profiles
            .write()
            .unwrap()
            .insert(profile.user_identifier.clone(), profile);
    }

    pub fn remove_profile(&self, user_identifier: &str) {
        self.profiles.write().unwrap().remove(user_identifier);
    }

    pub fn set_status(&self, email: &str, status: IdamStatus) {
        self.statuses
            .write()
            .unwrap()
            .insert(email.to_string(), status);
    }

    pub fn set_delete_response(&self, response: DeleteOrganisationResponse) {
        *self.delete_response.write().unwrap() = response;
    }

    /// Override the automatic 201 registration
    pub fn set_creation_response(&self, response: UserProfileCreationResponse) {
        *self.creation_response.write().unwrap() = Some(response);
    }

    /// Make profile creation take this long
    pub fn set_creation_delay(&self, delay: Duration) {
        *self.creation_delay.write().unwrap() = Some(delay);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().unwrap() = unavailable;
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn record(&self, call: GatewayCall) -> AppResult<()> {
        self.calls.write().unwrap().push(call);
        if *self.unavailable.read().unwrap() {
            return Err(AppError::user_profile("user profile service unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserProfileGateway for MockUserProfileGateway {
    async fn fetch_users_by_identifiers(
        &self,
        user_identifiers: &[String],
        show_deleted: bool,
    ) -> AppResult<Vec<UserProfile>> {
        self.record(GatewayCall::FetchUsers {
            user_identifiers: user_identifiers.to_vec(),
            show_deleted,
        })?;

        let profiles = self.profiles.read().unwrap();
        let mut found: Vec<UserProfile> = user_identifiers
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect();
        found.sort_by(|a, b| a.user_identifier.cmp(&b.user_identifier));
        Ok(found)
    }

    async fn fetch_status_by_email(&self, email: &str) -> AppResult<Option<IdamStatus>> {
        self.record(GatewayCall::FetchStatus(email.to_string()))?;
        Ok(self.statuses.read().unwrap().get(email).cloned())
    }

    async fn delete_profiles(
        &self,
        user_identifiers: &[String],
    ) -> AppResult<DeleteOrganisationResponse> {
        self.record(GatewayCall::DeleteProfiles(user_identifiers.to_vec()))?;
        Ok(self.delete_response.read().unwrap().clone())
    }

    async fn create_profile(
        &self,
        request: &UserProfileCreationRequest,
    ) -> AppResult<UserProfileCreationResponse> {
        self.record(GatewayCall::CreateProfile(request.email.clone()))?;

        let delay = *self.creation_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(response) = self.creation_response.read().unwrap().clone() {
            return Ok(response);
        }

        let idam_id = format!(
            "idam-{:04}",
            self.next_id.fetch_add(1, Ordering::SeqCst)
        );
        self.add_profile(UserProfile {
            user_identifier: idam_id.clone(),
            first_name: Some(request.first_name.clone()),
            last_name: Some(request.last_name.clone()),
            email: Some(request.email.clone()),
            idam_status: Some(IdamStatus::Pending),
            roles: request.roles.clone(),
        });

        Ok(UserProfileCreationResponse {
            idam_id: Some(idam_id),
            idam_registration_response: Some(IDAM_REGISTRATION_CREATED),
        })
    }
}

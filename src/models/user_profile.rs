//! Wire types of the user profile service

use serde::{Deserialize, Serialize};

use super::IdamStatus;

/// Registration response code meaning the identity was created
pub const IDAM_REGISTRATION_CREATED: u16 = 201;

/// A user as known to the user profile service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "idamId")]
    pub user_identifier: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub idam_status: Option<IdamStatus>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveUserProfilesRequest {
    pub user_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserProfilesResponse {
    #[serde(default)]
    pub user_profiles: Vec<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserProfilesRequest {
    pub user_ids: Vec<String>,
}

/// Body returned by the user profile deletion endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserProfilesResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned when looking a user up by email
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserResponse {
    #[serde(default)]
    pub user_identifier: Option<String>,
    #[serde(default)]
    pub idam_status: Option<String>,
}

/// Request to register a user with the identity system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileCreationRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub language_preference: String,
    pub user_category: String,
    pub user_type: String,
    pub roles: Vec<String>,
    pub resend_invite: bool,
}

impl UserProfileCreationRequest {
    pub fn for_super_user(
        email: &str,
        first_name: &str,
        last_name: &str,
        roles: Vec<String>,
    ) -> Self {
        Self {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            language_preference: "EN".to_string(),
            user_category: "PROFESSIONAL".to_string(),
            user_type: "EXTERNAL".to_string(),
            roles,
            resend_invite: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileCreationResponse {
    #[serde(default)]
    pub idam_id: Option<String>,
    #[serde(default)]
    pub idam_registration_response: Option<u16>,
}

impl UserProfileCreationResponse {
    pub fn is_user_created(&self) -> bool {
        self.idam_registration_response == Some(IDAM_REGISTRATION_CREATED)
    }
}

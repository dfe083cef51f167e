//! Inbound request payloads

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Payload for creating or updating an organisation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationCreationRequest {
    pub name: String,
    /// Ignored on creation (always PENDING); required on update
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sra_id: Option<String>,
    #[serde(default)]
    pub sra_regulated: Option<String>,
    #[serde(default)]
    pub company_number: Option<String>,
    #[serde(default)]
    pub company_url: Option<String>,
    pub super_user: UserCreationRequest,
    #[serde(default)]
    pub payment_account: Option<HashSet<String>>,
    #[serde(default)]
    pub contact_information: Option<Vec<ContactInformationCreationRequest>>,
}

/// Descriptor of the super user created alongside an organisation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreationRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserCreationRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Option<&str>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.map(|e| {
                if e.trim().is_empty() {
                    e.to_string()
                } else {
                    e.to_lowercase()
                }
            }),
            roles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInformationCreationRequest {
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_line3: Option<String>,
    #[serde(default)]
    pub town_city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
    #[serde(default)]
    pub dx_address: Option<Vec<DxAddressCreationRequest>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DxAddressCreationRequest {
    #[serde(default)]
    pub dx_number: Option<String>,
    #[serde(default)]
    pub dx_exchange: Option<String>,
}

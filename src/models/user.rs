//! Professional user model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity status reported by the user profile service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdamStatus {
    Active,
    Pending,
    Suspended,
    Other(String),
}

impl IdamStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, IdamStatus::Active)
    }
}

impl FromStr for IdamStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "ACTIVE" => IdamStatus::Active,
            "PENDING" => IdamStatus::Pending,
            "SUSPENDED" => IdamStatus::Suspended,
            _ => IdamStatus::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for IdamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdamStatus::Active => f.write_str("ACTIVE"),
            IdamStatus::Pending => f.write_str("PENDING"),
            IdamStatus::Suspended => f.write_str("SUSPENDED"),
            IdamStatus::Other(s) => f.write_str(s),
        }
    }
}

impl Serialize for IdamStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IdamStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_else(|never| match never {}))
    }
}

/// A user belonging to exactly one organisation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalUser {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    /// Assigned by the identity system; absent until the user is registered there
    pub user_identifier: Option<String>,
    pub user_attributes: Vec<UserAttribute>,
    pub created: DateTime<Utc>,
    /// Filled in by reconciliation, never persisted
    #[serde(default)]
    pub idam_status: Option<IdamStatus>,
    /// Filled in by reconciliation, never persisted
    #[serde(default)]
    pub roles: Vec<String>,
}

impl ProfessionalUser {
    pub fn new(
        organisation_id: Uuid,
        first_name: String,
        last_name: String,
        email_address: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organisation_id,
            first_name,
            last_name,
            email_address,
            user_identifier: None,
            user_attributes: Vec::new(),
            created: Utc::now(),
            idam_status: None,
            roles: Vec::new(),
        }
    }
}

/// Role attribute attached to a professional user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAttribute {
    pub id: Uuid,
    pub professional_user_id: Uuid,
    pub role: String,
}

impl UserAttribute {
    pub fn new(professional_user_id: Uuid, role: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            professional_user_id,
            role: role.into(),
        }
    }
}

/// Link between a user and a payment account of their organisation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccountMap {
    pub professional_user_id: Uuid,
    pub payment_account_id: Uuid,
    pub default_pba: bool,
}

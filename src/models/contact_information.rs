//! Contact information and DX address models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactInformation {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub town_city: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub post_code: Option<String>,
    pub dx_addresses: Vec<DxAddress>,
    pub created: Option<DateTime<Utc>>,
}

/// Document exchange address nested under a contact information record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DxAddress {
    pub id: Uuid,
    pub contact_information_id: Uuid,
    pub dx_number: Option<String>,
    pub dx_exchange: Option<String>,
}

impl DxAddress {
    pub fn new(
        contact_information_id: Uuid,
        dx_number: Option<String>,
        dx_exchange: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_information_id,
            dx_number,
            dx_exchange,
        }
    }
}

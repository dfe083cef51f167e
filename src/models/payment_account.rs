//! Payment account (PBA) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentAccount {
    pub id: Uuid,
    pub organisation_id: Uuid,
    /// Always stored upper-case
    pub pba_number: String,
    pub created: DateTime<Utc>,
}

impl PaymentAccount {
    pub fn new(organisation_id: Uuid, pba_number: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            organisation_id,
            pba_number: pba_number.to_uppercase(),
            created: Utc::now(),
        }
    }
}

//! Organisation aggregate

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ContactInformation, PaymentAccount, ProfessionalUser};

/// Organisation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganisationStatus {
    Pending,
    Active,
    Blocked,
    Deleted,
}

impl OrganisationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganisationStatus::Pending => "PENDING",
            OrganisationStatus::Active => "ACTIVE",
            OrganisationStatus::Blocked => "BLOCKED",
            OrganisationStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for OrganisationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganisationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(OrganisationStatus::Pending),
            "ACTIVE" => Ok(OrganisationStatus::Active),
            "BLOCKED" => Ok(OrganisationStatus::Blocked),
            "DELETED" => Ok(OrganisationStatus::Deleted),
            other => Err(format!("Unknown organisation status: {}", other)),
        }
    }
}

/// A registered law firm or professional body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    pub organisation_identifier: String,
    pub name: String,
    pub status: OrganisationStatus,
    pub sra_id: Option<String>,
    pub company_number: Option<String>,
    pub sra_regulated: bool,
    pub company_url: Option<String>,
    /// Users in creation order; the first one is the super user
    pub users: Vec<ProfessionalUser>,
    pub payment_accounts: Vec<PaymentAccount>,
    pub contact_information: Vec<ContactInformation>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Organisation {
    /// Build a new, not yet persisted, organisation
    pub fn new(
        organisation_identifier: String,
        name: String,
        status: OrganisationStatus,
        sra_id: Option<String>,
        company_number: Option<String>,
        sra_regulated: bool,
        company_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organisation_identifier,
            name,
            status,
            sra_id,
            company_number,
            sra_regulated,
            company_url,
            users: Vec::new(),
            payment_accounts: Vec::new(),
            contact_information: Vec::new(),
            created: now,
            last_updated: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == OrganisationStatus::Active
    }

    pub fn super_user(&self) -> Option<&ProfessionalUser> {
        self.users.first()
    }

    /// Remote identifier of the first user, if the identity system assigned one
    pub fn first_user_identifier(&self) -> Option<&str> {
        self.users
            .first()
            .and_then(|u| u.user_identifier.as_deref())
    }

    pub fn add_payment_account(&mut self, account: PaymentAccount) {
        self.payment_accounts.push(account);
    }

    pub fn add_professional_user(&mut self, user: ProfessionalUser) {
        self.users.push(user);
    }

    pub fn add_contact_information(&mut self, contact_information: ContactInformation) {
        self.contact_information.push(contact_information);
    }
}

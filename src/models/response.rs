//! Response views exposed to the boundary layer

use serde::{Deserialize, Serialize};

use super::{ContactInformation, DxAddress, IdamStatus, Organisation, ProfessionalUser};

/// Status code reported for a successful deletion
pub const STATUS_CODE_204: u16 = 204;
pub const ERROR_CODE_400: u16 = 400;
pub const ERROR_CODE_500: u16 = 500;

pub const DELETION_SUCCESS_MSG: &str = "The organisation has been deleted successfully";
pub const ERROR_MESSAGE_400_ORG_MORE_THAN_ONE_USER: &str =
    "The organisation cannot be deleted as it has more than one user";
pub const ERROR_MESSAGE_400_ADMIN_NOT_PENDING: &str =
    "The organisation admin is not in pending state";
pub const ERR_MESG_500_ADMIN_NOTFOUNDUP: &str =
    "Organisation admin not found in the user profile system";

/// Create / update view of an organisation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationResponse {
    pub organisation_identifier: String,
}

impl From<&Organisation> for OrganisationResponse {
    fn from(organisation: &Organisation) -> Self {
        Self {
            organisation_identifier: organisation.organisation_identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuperUserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idam_status: Option<IdamStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl From<&ProfessionalUser> for SuperUserResponse {
    fn from(user: &ProfessionalUser) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email_address.clone(),
            user_identifier: user.user_identifier.clone(),
            idam_status: user.idam_status.clone(),
            roles: user.roles.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DxAddressResponse {
    pub dx_number: Option<String>,
    pub dx_exchange: Option<String>,
}

impl From<&DxAddress> for DxAddressResponse {
    fn from(dx: &DxAddress) -> Self {
        Self {
            dx_number: dx.dx_number.clone(),
            dx_exchange: dx.dx_exchange.clone(),
        }
    }
}

/// Contact information together with its DX addresses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactInformationResponse {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub town_city: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub post_code: Option<String>,
    pub dx_address: Vec<DxAddressResponse>,
}

impl From<&ContactInformation> for ContactInformationResponse {
    fn from(ci: &ContactInformation) -> Self {
        Self {
            address_line1: ci.address_line1.clone(),
            address_line2: ci.address_line2.clone(),
            address_line3: ci.address_line3.clone(),
            town_city: ci.town_city.clone(),
            county: ci.county.clone(),
            country: ci.country.clone(),
            post_code: ci.post_code.clone(),
            dx_address: ci.dx_addresses.iter().map(DxAddressResponse::from).collect(),
        }
    }
}

/// Detailed view of a single organisation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationEntityResponse {
    pub organisation_identifier: String,
    pub name: String,
    pub status: String,
    pub sra_id: Option<String>,
    pub sra_regulated: bool,
    pub company_number: Option<String>,
    pub company_url: Option<String>,
    pub super_user: Option<SuperUserResponse>,
    pub payment_account: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_information: Option<Vec<ContactInformationResponse>>,
}

impl OrganisationEntityResponse {
    /// Build the view; contact information is only included for detail views
    pub fn new(organisation: &Organisation, is_entity_detail: bool) -> Self {
        Self {
            organisation_identifier: organisation.organisation_identifier.clone(),
            name: organisation.name.clone(),
            status: organisation.status.to_string(),
            sra_id: organisation.sra_id.clone(),
            sra_regulated: organisation.sra_regulated,
            company_number: organisation.company_number.clone(),
            company_url: organisation.company_url.clone(),
            super_user: organisation.super_user().map(SuperUserResponse::from),
            payment_account: organisation
                .payment_accounts
                .iter()
                .map(|pa| pa.pba_number.clone())
                .collect(),
            contact_information: is_entity_detail.then(|| {
                organisation
                    .contact_information
                    .iter()
                    .map(ContactInformationResponse::from)
                    .collect()
            }),
        }
    }
}

/// List view of organisations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationsDetailResponse {
    pub organisations: Vec<OrganisationEntityResponse>,
}

impl OrganisationsDetailResponse {
    pub fn new(organisations: &[Organisation], is_entity_detail: bool) -> Self {
        Self {
            organisations: organisations
                .iter()
                .map(|org| OrganisationEntityResponse::new(org, is_entity_detail))
                .collect(),
        }
    }
}

/// Outcome of the organisation deletion workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrganisationResponse {
    pub status_code: u16,
    pub message: String,
}

impl DeleteOrganisationResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    pub fn deleted() -> Self {
        Self::new(STATUS_CODE_204, DELETION_SUCCESS_MSG)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_CODE_204
    }
}

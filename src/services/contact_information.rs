//! Contact information and DX address management for organisations

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::ContactInformationRepository;
use crate::models::{ContactInformation, ContactInformationCreationRequest, DxAddress, Organisation};
use crate::utils::validation::remove_empty_spaces;
use crate::utils::AppResult;

fn normalize(value: &Option<String>) -> Option<String> {
    value.as_deref().map(remove_empty_spaces)
}

/// Persist each contact descriptor, then its DX addresses in one batch
pub async fn add_contact_information(
    conn: &mut SqliteConnection,
    requests: Option<&[ContactInformationCreationRequest]>,
    organisation: &mut Organisation,
) -> AppResult<()> {
    let Some(requests) = requests else {
        return Ok(());
    };

    let mut repo = ContactInformationRepository::new(conn);
    for request in requests {
        let mut contact = ContactInformation {
            id: Uuid::new_v4(),
            organisation_id: organisation.id,
            address_line1: normalize(&request.address_line1),
            address_line2: normalize(&request.address_line2),
            address_line3: normalize(&request.address_line3),
            town_city: normalize(&request.town_city),
            county: normalize(&request.county),
            country: normalize(&request.country),
            post_code: normalize(&request.post_code),
            dx_addresses: Vec::new(),
            created: Some(chrono::Utc::now()),
        };
        repo.insert(&contact).await?;

        if let Some(dx_requests) = &request.dx_address {
            let dx_addresses: Vec<DxAddress> = dx_requests
                .iter()
                .map(|dx| {
                    DxAddress::new(
                        contact.id,
                        normalize(&dx.dx_number),
                        normalize(&dx.dx_exchange),
                    )
                })
                .collect();
            repo.insert_all_dx_addresses(&dx_addresses).await?;
            contact.dx_addresses = dx_addresses;
        }

        organisation.add_contact_information(contact);
    }

    Ok(())
}

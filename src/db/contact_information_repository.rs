//! Contact information and DX address repository

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::organisation_repository::group_by_organisation;
use super::{parse_db_timestamp, parse_db_uuid, placeholders};
use crate::models::{ContactInformation, DxAddress};
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct ContactInformationRow {
    id: String,
    organisation_id: String,
    address_line1: Option<String>,
    address_line2: Option<String>,
    address_line3: Option<String>,
    town_city: Option<String>,
    county: Option<String>,
    country: Option<String>,
    post_code: Option<String>,
    created: String,
}

#[derive(Debug, sqlx::FromRow)]
struct DxAddressRow {
    id: String,
    contact_information_id: String,
    dx_number: Option<String>,
    dx_exchange: Option<String>,
}

pub struct ContactInformationRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> ContactInformationRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, contact: &ContactInformation) -> AppResult<()> {
        let created = contact.created.unwrap_or_else(chrono::Utc::now);

        sqlx::query(
            r#"
            INSERT INTO contact_information (id, organisation_id, address_line1, address_line2,
                address_line3, town_city, county, country, post_code, created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(contact.id.to_string())
        .bind(contact.organisation_id.to_string())
        .bind(&contact.address_line1)
        .bind(&contact.address_line2)
        .bind(&contact.address_line3)
        .bind(&contact.town_city)
        .bind(&contact.county)
        .bind(&contact.country)
        .bind(&contact.post_code)
        .bind(created.to_rfc3339())
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Write all DX addresses in a single multi-row insert
    pub async fn insert_all_dx_addresses(&mut self, dx_addresses: &[DxAddress]) -> AppResult<()> {
        if dx_addresses.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO dx_address (id, contact_information_id, dx_number, dx_exchange) ",
        );
        builder.push_values(dx_addresses, |mut row, dx| {
            row.push_bind(dx.id.to_string())
                .push_bind(dx.contact_information_id.to_string())
                .push_bind(dx.dx_number.clone())
                .push_bind(dx.dx_exchange.clone());
        });

        builder.build().execute(&mut *self.conn).await?;

        Ok(())
    }

    /// Contact information keyed by organisation id, DX addresses attached
    pub async fn find_by_organisation_ids(
        &mut self,
        organisation_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<ContactInformation>>> {
        if organisation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT id, organisation_id, address_line1, address_line2, address_line3,
                    town_city, county, country, post_code, created
             FROM contact_information
             WHERE organisation_id IN ({})
             ORDER BY rowid",
            placeholders(organisation_ids.len())
        );

        let mut query_builder = sqlx::query_as::<_, ContactInformationRow>(&query);
        for id in organisation_ids {
            query_builder = query_builder.bind(id);
        }
        let rows = query_builder.fetch_all(&mut *self.conn).await?;

        let contact_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut dx_addresses = self.find_dx_addresses_by_contact_ids(&contact_ids).await?;

        let contacts = rows
            .into_iter()
            .map(|row| {
                let contact = ContactInformation {
                    id: parse_db_uuid(&row.id)?,
                    organisation_id: parse_db_uuid(&row.organisation_id)?,
                    address_line1: row.address_line1,
                    address_line2: row.address_line2,
                    address_line3: row.address_line3,
                    town_city: row.town_city,
                    county: row.county,
                    country: row.country,
                    post_code: row.post_code,
                    dx_addresses: dx_addresses.remove(&row.id).unwrap_or_default(),
                    created: Some(parse_db_timestamp(&row.created)?),
                };
                Ok((row.organisation_id, contact))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_by_organisation(contacts))
    }

    async fn find_dx_addresses_by_contact_ids(
        &mut self,
        contact_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<DxAddress>>> {
        if contact_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT id, contact_information_id, dx_number, dx_exchange
             FROM dx_address
             WHERE contact_information_id IN ({})
             ORDER BY rowid",
            placeholders(contact_ids.len())
        );

        let mut query_builder = sqlx::query_as::<_, DxAddressRow>(&query);
        for id in contact_ids {
            query_builder = query_builder.bind(id);
        }
        let rows = query_builder.fetch_all(&mut *self.conn).await?;

        let mut grouped: HashMap<String, Vec<DxAddress>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.contact_information_id.clone())
                .or_default()
                .push(DxAddress {
                    id: parse_db_uuid(&row.id)?,
                    contact_information_id: parse_db_uuid(&row.contact_information_id)?,
                    dx_number: row.dx_number,
                    dx_exchange: row.dx_exchange,
                });
        }

        Ok(grouped)
    }
}

//! Organisation repository

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::{
    parse_db_timestamp, parse_db_uuid, ContactInformationRepository, PaymentAccountRepository,
    ProfessionalUserRepository,
};
use crate::models::{Organisation, OrganisationStatus};
use crate::utils::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct OrganisationRow {
    id: String,
    organisation_identifier: String,
    name: String,
    status: String,
    sra_id: Option<String>,
    company_number: Option<String>,
    sra_regulated: bool,
    company_url: Option<String>,
    created: String,
    last_updated: String,
}

const SELECT_ORGANISATION: &str = r#"
    SELECT id, organisation_identifier, name, status, sra_id, company_number,
           sra_regulated, company_url, created, last_updated
    FROM organisation
"#;

pub struct OrganisationRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> OrganisationRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert the organisation row only; sub-entities are written by their own repositories.
    ///
    /// A duplicate organisation identifier surfaces as [`AppError::Conflict`].
    pub async fn insert(&mut self, organisation: &Organisation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO organisation (id, organisation_identifier, name, status, sra_id,
                company_number, sra_regulated, company_url, created, last_updated)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(organisation.id.to_string())
        .bind(&organisation.organisation_identifier)
        .bind(&organisation.name)
        .bind(organisation.status.as_str())
        .bind(&organisation.sra_id)
        .bind(&organisation.company_number)
        .bind(organisation.sra_regulated)
        .bind(&organisation.company_url)
        .bind(organisation.created.to_rfc3339())
        .bind(organisation.last_updated.to_rfc3339())
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Overwrite the mutable organisation columns
    pub async fn update(&mut self, organisation: &Organisation) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE organisation
            SET name = ?, status = ?, sra_id = ?, company_number = ?,
                sra_regulated = ?, company_url = ?, last_updated = ?
            WHERE id = ?
            "#,
        )
        .bind(&organisation.name)
        .bind(organisation.status.as_str())
        .bind(&organisation.sra_id)
        .bind(&organisation.company_number)
        .bind(organisation.sra_regulated)
        .bind(&organisation.company_url)
        .bind(Utc::now().to_rfc3339())
        .bind(organisation.id.to_string())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::empty_result(format!(
                "Organisation {} no longer exists",
                organisation.organisation_identifier
            )));
        }
        Ok(())
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Organisation>> {
        let query = format!("{} ORDER BY rowid", SELECT_ORGANISATION);
        let rows = sqlx::query_as::<_, OrganisationRow>(&query)
            .fetch_all(&mut *self.conn)
            .await?;

        self.load_aggregates(rows).await
    }

    pub async fn find_by_identifier(&mut self, identifier: &str) -> AppResult<Option<Organisation>> {
        let query = format!("{} WHERE organisation_identifier = ?", SELECT_ORGANISATION);
        let row = sqlx::query_as::<_, OrganisationRow>(&query)
            .bind(identifier)
            .fetch_optional(&mut *self.conn)
            .await?;

        match row {
            Some(row) => Ok(self.load_aggregates(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn find_by_status(&mut self, status: OrganisationStatus) -> AppResult<Vec<Organisation>> {
        let query = format!("{} WHERE status = ? ORDER BY rowid", SELECT_ORGANISATION);
        let rows = sqlx::query_as::<_, OrganisationRow>(&query)
            .bind(status.as_str())
            .fetch_all(&mut *self.conn)
            .await?;

        self.load_aggregates(rows).await
    }

    /// Delete the organisation; sub-entities go with it through ON DELETE CASCADE
    pub async fn delete_by_id(&mut self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organisation WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach users, payment accounts and contact information, batched per table
    async fn load_aggregates(&mut self, rows: Vec<OrganisationRow>) -> AppResult<Vec<Organisation>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

        let mut users = ProfessionalUserRepository::new(&mut *self.conn)
            .find_by_organisation_ids(&ids)
            .await?;
        let mut accounts = PaymentAccountRepository::new(&mut *self.conn)
            .find_by_organisation_ids(&ids)
            .await?;
        let mut contacts = ContactInformationRepository::new(&mut *self.conn)
            .find_by_organisation_ids(&ids)
            .await?;

        rows.into_iter()
            .map(|row| {
                let mut organisation = row_to_organisation(&row)?;
                organisation.users = users.remove(&row.id).unwrap_or_default();
                organisation.payment_accounts = accounts.remove(&row.id).unwrap_or_default();
                organisation.contact_information = contacts.remove(&row.id).unwrap_or_default();
                Ok(organisation)
            })
            .collect()
    }
}

fn row_to_organisation(row: &OrganisationRow) -> AppResult<Organisation> {
    let status = row
        .status
        .parse::<OrganisationStatus>()
        .map_err(AppError::Database)?;

    Ok(Organisation {
        id: parse_db_uuid(&row.id)?,
        organisation_identifier: row.organisation_identifier.clone(),
        name: row.name.clone(),
        status,
        sra_id: row.sra_id.clone(),
        company_number: row.company_number.clone(),
        sra_regulated: row.sra_regulated,
        company_url: row.company_url.clone(),
        users: Vec::new(),
        payment_accounts: Vec::new(),
        contact_information: Vec::new(),
        created: parse_db_timestamp(&row.created)?,
        last_updated: parse_db_timestamp(&row.last_updated)?,
    })
}

/// Group child rows by their organisation id
pub(crate) fn group_by_organisation<T>(
    items: impl IntoIterator<Item = (String, T)>,
) -> HashMap<String, Vec<T>> {
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for (organisation_id, item) in items {
        grouped.entry(organisation_id).or_default().push(item);
    }
    grouped
}

//! Payment account repository

use std::collections::HashMap;

use sqlx::SqliteConnection;

use super::organisation_repository::group_by_organisation;
use super::{parse_db_timestamp, parse_db_uuid, placeholders};
use crate::models::PaymentAccount;
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct PaymentAccountRow {
    id: String,
    organisation_id: String,
    pba_number: String,
    created: String,
}

pub struct PaymentAccountRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> PaymentAccountRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, account: &PaymentAccount) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO payment_account (id, organisation_id, pba_number, created) VALUES (?, ?, ?, ?)",
        )
        .bind(account.id.to_string())
        .bind(account.organisation_id.to_string())
        .bind(&account.pba_number)
        .bind(account.created.to_rfc3339())
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    pub async fn find_by_organisation_ids(
        &mut self,
        organisation_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<PaymentAccount>>> {
        if organisation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT id, organisation_id, pba_number, created
             FROM payment_account
             WHERE organisation_id IN ({})
             ORDER BY rowid",
            placeholders(organisation_ids.len())
        );

        let mut query_builder = sqlx::query_as::<_, PaymentAccountRow>(&query);
        for id in organisation_ids {
            query_builder = query_builder.bind(id);
        }
        let rows = query_builder.fetch_all(&mut *self.conn).await?;

        let accounts = rows
            .into_iter()
            .map(|row| {
                let account = PaymentAccount {
                    id: parse_db_uuid(&row.id)?,
                    organisation_id: parse_db_uuid(&row.organisation_id)?,
                    pba_number: row.pba_number,
                    created: parse_db_timestamp(&row.created)?,
                };
                Ok((row.organisation_id, account))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_by_organisation(accounts))
    }
}

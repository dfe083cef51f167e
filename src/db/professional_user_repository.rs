//! Professional user repository
//!
//! Also owns the user attribute and user account map tables, which only exist
//! in relation to a professional user.

use std::collections::HashMap;

use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::organisation_repository::group_by_organisation;
use super::{parse_db_timestamp, parse_db_uuid, placeholders};
use crate::models::{ProfessionalUser, UserAccountMap, UserAttribute};
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct ProfessionalUserRow {
    id: String,
    organisation_id: String,
    first_name: String,
    last_name: String,
    email_address: String,
    user_identifier: Option<String>,
    created: String,
}

pub struct ProfessionalUserRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> ProfessionalUserRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, user: &ProfessionalUser) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO professional_user (id, organisation_id, first_name, last_name,
                email_address, user_identifier, created)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.organisation_id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email_address)
        .bind(&user.user_identifier)
        .bind(user.created.to_rfc3339())
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Store the identifier assigned by the identity system
    pub async fn set_user_identifier(&mut self, user_id: Uuid, user_identifier: &str) -> AppResult<()> {
        sqlx::query("UPDATE professional_user SET user_identifier = ? WHERE id = ?")
            .bind(user_identifier)
            .bind(user_id.to_string())
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    pub async fn count_by_organisation_id(&mut self, organisation_id: Uuid) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM professional_user WHERE organisation_id = ?")
                .bind(organisation_id.to_string())
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(count)
    }

    /// Users keyed by organisation id, each list in creation order with attributes attached
    pub async fn find_by_organisation_ids(
        &mut self,
        organisation_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<ProfessionalUser>>> {
        if organisation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT id, organisation_id, first_name, last_name, email_address, user_identifier, created
             FROM professional_user
             WHERE organisation_id IN ({})
             ORDER BY rowid",
            placeholders(organisation_ids.len())
        );

        let mut query_builder = sqlx::query_as::<_, ProfessionalUserRow>(&query);
        for id in organisation_ids {
            query_builder = query_builder.bind(id);
        }
        let rows = query_builder.fetch_all(&mut *self.conn).await?;

        let user_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut attributes = self.find_attributes_by_user_ids(&user_ids).await?;

        let users = rows
            .into_iter()
            .map(|row| {
                let mut user = row_to_user(&row)?;
                user.user_attributes = attributes.remove(&row.id).unwrap_or_default();
                Ok((row.organisation_id, user))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_by_organisation(users))
    }

    pub async fn insert_attribute(&mut self, attribute: &UserAttribute) -> AppResult<()> {
        sqlx::query("INSERT INTO user_attribute (id, professional_user_id, role) VALUES (?, ?, ?)")
            .bind(attribute.id.to_string())
            .bind(attribute.professional_user_id.to_string())
            .bind(&attribute.role)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    pub async fn find_attributes_by_user_ids(
        &mut self,
        user_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<UserAttribute>>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT id, professional_user_id, role FROM user_attribute
             WHERE professional_user_id IN ({})
             ORDER BY rowid",
            placeholders(user_ids.len())
        );

        let mut query_builder = sqlx::query(&query);
        for id in user_ids {
            query_builder = query_builder.bind(id);
        }
        let rows = query_builder.fetch_all(&mut *self.conn).await?;

        let mut attributes: HashMap<String, Vec<UserAttribute>> = HashMap::new();
        for row in rows {
            let user_id: String = row.get("professional_user_id");
            let id: String = row.get("id");
            attributes
                .entry(user_id.clone())
                .or_default()
                .push(UserAttribute {
                    id: parse_db_uuid(&id)?,
                    professional_user_id: parse_db_uuid(&user_id)?,
                    role: row.get("role"),
                });
        }

        Ok(attributes)
    }

    pub async fn insert_account_map(&mut self, account_map: &UserAccountMap) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_account_map (professional_user_id, payment_account_id, default_pba)
             VALUES (?, ?, ?)",
        )
        .bind(account_map.professional_user_id.to_string())
        .bind(account_map.payment_account_id.to_string())
        .bind(account_map.default_pba)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    pub async fn find_account_maps_by_user_id(&mut self, user_id: Uuid) -> AppResult<Vec<UserAccountMap>> {
        let rows = sqlx::query(
            "SELECT professional_user_id, payment_account_id, default_pba
             FROM user_account_map WHERE professional_user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(UserAccountMap {
                    professional_user_id: parse_db_uuid(&row.get::<String, _>("professional_user_id"))?,
                    payment_account_id: parse_db_uuid(&row.get::<String, _>("payment_account_id"))?,
                    default_pba: row.get("default_pba"),
                })
            })
            .collect()
    }
}

fn row_to_user(row: &ProfessionalUserRow) -> AppResult<ProfessionalUser> {
    Ok(ProfessionalUser {
        id: parse_db_uuid(&row.id)?,
        organisation_id: parse_db_uuid(&row.organisation_id)?,
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        email_address: row.email_address.clone(),
        user_identifier: row.user_identifier.clone(),
        user_attributes: Vec::new(),
        created: parse_db_timestamp(&row.created)?,
        idam_status: None,
        roles: Vec::new(),
    })
}

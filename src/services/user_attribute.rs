//! Default role attributes for organisation super users

use sqlx::SqliteConnection;

use crate::db::ProfessionalUserRepository;
use crate::models::{ProfessionalUser, UserAttribute};
use crate::utils::AppResult;

#[derive(Debug, Clone)]
pub struct UserAttributeService {
    super_user_roles: Vec<String>,
}

impl UserAttributeService {
    pub fn new(super_user_roles: Vec<String>) -> Self {
        Self { super_user_roles }
    }

    pub fn super_user_roles(&self) -> &[String] {
        &self.super_user_roles
    }

    /// Persist one attribute per super user role, returned after `existing`
    pub async fn add_user_attributes_to_super_user(
        &self,
        conn: &mut SqliteConnection,
        user: &ProfessionalUser,
        existing: Vec<UserAttribute>,
    ) -> AppResult<Vec<UserAttribute>> {
        let mut attributes = existing;
        let mut repo = ProfessionalUserRepository::new(conn);

        for role in &self.super_user_roles {
            let attribute = UserAttribute::new(user.id, role.as_str());
            repo.insert_attribute(&attribute).await?;
            attributes.push(attribute);
        }

        Ok(attributes)
    }
}

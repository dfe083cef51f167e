//! Organisation lifecycle service
//!
//! Creates, retrieves, updates and deletes organisations together with their
//! super user, payment accounts and contact information. Local writes run in a
//! single SQLite transaction; calls to the user profile service happen outside it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::contact_information::add_contact_information;
use super::payment_account::add_pba_accounts;
use super::reconciliation::{reconcile_active_organisations, reconcile_users};
use super::user_account_map::persist_user_account_map;
use super::user_attribute::UserAttributeService;
use super::user_profile::UserProfileGateway;
use crate::config::OrganisationConfig;
use crate::db::{DbPool, OrganisationRepository, ProfessionalUserRepository};
use crate::models::{
    DeleteOrganisationResponse, Organisation, OrganisationCreationRequest,
    OrganisationEntityResponse, OrganisationResponse, OrganisationStatus,
    OrganisationsDetailResponse, ProfessionalUser, UserCreationRequest,
    UserProfileCreationRequest, ERROR_CODE_400, ERROR_CODE_500,
    ERROR_MESSAGE_400_ADMIN_NOT_PENDING, ERROR_MESSAGE_400_ORG_MORE_THAN_ONE_USER,
    ERR_MESG_500_ADMIN_NOTFOUNDUP,
};
use crate::utils::generator::generate_unique_alphanumeric_id;
use crate::utils::validation::{parse_sra_regulated, remove_all_spaces, remove_empty_spaces};
use crate::utils::{AppError, AppResult};

/// Source of organisation identifiers for a requested length
pub type IdentifierGenerator = Arc<dyn Fn(usize) -> String + Send + Sync>;

fn strip(value: &Option<String>) -> Option<String> {
    value.as_deref().map(remove_all_spaces)
}

/// Orchestrates the organisation lifecycle
#[derive(Clone)]
pub struct OrganisationService {
    pool: DbPool,
    gateway: Arc<dyn UserProfileGateway>,
    identifier_length: usize,
    id_generator: IdentifierGenerator,
    user_attribute_service: UserAttributeService,
}

impl OrganisationService {
    pub fn new(
        pool: DbPool,
        gateway: Arc<dyn UserProfileGateway>,
        config: &OrganisationConfig,
    ) -> Self {
        Self {
            pool,
            gateway,
            identifier_length: config.identifier_length,
            id_generator: Arc::new(generate_unique_alphanumeric_id),
            user_attribute_service: UserAttributeService::new(config.super_user_roles.clone()),
        }
    }

    /// Replace the identifier generator
    pub fn with_identifier_generator(mut self, generator: IdentifierGenerator) -> Self {
        self.id_generator = generator;
        self
    }

    fn next_identifier(&self) -> String {
        (self.id_generator)(self.identifier_length)
    }

    /// Create an organisation in PENDING status with its super user and
    /// optional payment accounts and contact information
    pub async fn create_organisation(
        &self,
        request: &OrganisationCreationRequest,
    ) -> AppResult<OrganisationResponse> {
        let email = request
            .super_user
            .email
            .as_deref()
            .ok_or_else(|| AppError::invalid_request("Email cannot be null"))?;

        let mut organisation = Organisation::new(
            self.next_identifier(),
            remove_all_spaces(&request.name),
            OrganisationStatus::Pending,
            strip(&request.sra_id),
            strip(&request.company_number),
            parse_sra_regulated(request.sra_regulated.as_deref()),
            strip(&request.company_url),
        );

        let mut tx = self.pool.begin().await?;

        match OrganisationRepository::new(&mut *tx).insert(&organisation).await {
            Ok(()) => {}
            Err(AppError::Conflict(msg)) => {
                debug!(
                    "Organisation identifier {} already taken ({}), regenerating",
                    organisation.organisation_identifier, msg
                );
                organisation.organisation_identifier = self.next_identifier();
                OrganisationRepository::new(&mut *tx)
                    .insert(&organisation)
                    .await?;
            }
            Err(e) => return Err(e),
        }

        add_pba_accounts(
            &mut *tx,
            request.payment_account.as_ref(),
            &mut organisation,
            false,
        )
        .await?;

        self.add_super_user(&mut *tx, &request.super_user, email, &mut organisation)
            .await?;

        add_contact_information(
            &mut *tx,
            request.contact_information.as_deref(),
            &mut organisation,
        )
        .await?;

        tx.commit().await?;

        info!(
            "Created organisation {} ({})",
            organisation.organisation_identifier, organisation.name
        );

        Ok(OrganisationResponse::from(&organisation))
    }

    async fn add_super_user(
        &self,
        conn: &mut sqlx::SqliteConnection,
        super_user: &UserCreationRequest,
        email: &str,
        organisation: &mut Organisation,
    ) -> AppResult<()> {
        let mut user = ProfessionalUser::new(
            organisation.id,
            remove_empty_spaces(&super_user.first_name),
            remove_empty_spaces(&super_user.last_name),
            remove_all_spaces(email).to_lowercase(),
        );

        ProfessionalUserRepository::new(&mut *conn)
            .insert(&user)
            .await?;

        user.user_attributes = self
            .user_attribute_service
            .add_user_attributes_to_super_user(&mut *conn, &user, Vec::new())
            .await?;

        persist_user_account_map(&mut *conn, &user, &organisation.payment_accounts).await?;

        organisation.add_professional_user(user);
        Ok(())
    }

    /// All pending organisations followed by the active ones the user profile
    /// service still knows about
    pub async fn retrieve_all_organisations(&self) -> AppResult<OrganisationsDetailResponse> {
        let organisations = {
            let mut conn = self.pool.acquire().await?;
            OrganisationRepository::new(&mut *conn).find_all().await?
        };

        if organisations.is_empty() {
            return Err(AppError::empty_result("No organisations found"));
        }

        let mut pending = Vec::new();
        let mut active = Vec::new();
        for organisation in organisations {
            match organisation.status {
                OrganisationStatus::Pending => pending.push(organisation),
                OrganisationStatus::Active => active.push(organisation),
                OrganisationStatus::Blocked | OrganisationStatus::Deleted => {}
            }
        }

        let active = reconcile_active_organisations(self.gateway.as_ref(), active).await?;
        debug!(
            "Retrieved {} pending and {} active organisations",
            pending.len(),
            active.len()
        );

        pending.extend(active);
        Ok(OrganisationsDetailResponse::new(&pending, true))
    }

    /// Full view of one organisation, users reconciled when it is active
    pub async fn retrieve_organisation(
        &self,
        organisation_identifier: &str,
    ) -> AppResult<OrganisationEntityResponse> {
        let mut organisation = self
            .get_organisation_by_identifier(organisation_identifier)
            .await?
            .ok_or_else(|| {
                AppError::empty_result(format!(
                    "Organisation {} not found",
                    organisation_identifier.trim()
                ))
            })?;

        if organisation.is_active() {
            let users = std::mem::take(&mut organisation.users);
            organisation.users = reconcile_users(self.gateway.as_ref(), users, false).await?;
        }

        Ok(OrganisationEntityResponse::new(&organisation, true))
    }

    /// Organisations in the given status; only PENDING and ACTIVE are listed
    pub async fn find_by_organisation_status(
        &self,
        status: OrganisationStatus,
    ) -> AppResult<OrganisationsDetailResponse> {
        let organisations = match status {
            OrganisationStatus::Pending => self.load_by_status(status).await?,
            OrganisationStatus::Active => {
                let active = self.load_by_status(status).await?;
                reconcile_active_organisations(self.gateway.as_ref(), active).await?
            }
            OrganisationStatus::Blocked | OrganisationStatus::Deleted => Vec::new(),
        };

        if organisations.is_empty() {
            return Err(AppError::empty_result(format!(
                "No organisations found with status {}",
                status
            )));
        }

        Ok(OrganisationsDetailResponse::new(&organisations, true))
    }

    async fn load_by_status(&self, status: OrganisationStatus) -> AppResult<Vec<Organisation>> {
        let mut conn = self.pool.acquire().await?;
        OrganisationRepository::new(&mut *conn)
            .find_by_status(status)
            .await
    }

    /// Plain lookup, no reconciliation
    pub async fn get_organisation_by_identifier(
        &self,
        organisation_identifier: &str,
    ) -> AppResult<Option<Organisation>> {
        let mut conn = self.pool.acquire().await?;
        OrganisationRepository::new(&mut *conn)
            .find_by_identifier(&remove_all_spaces(organisation_identifier))
            .await
    }

    /// Overwrite the organisation's attributes and status.
    ///
    /// Activating a pending organisation registers its super user with the
    /// user profile service when that has not happened yet.
    pub async fn update_organisation(
        &self,
        request: &OrganisationCreationRequest,
        organisation_identifier: &str,
    ) -> AppResult<OrganisationResponse> {
        let status = request
            .status
            .as_deref()
            .ok_or_else(|| AppError::invalid_request("Organisation status is required"))?
            .parse::<OrganisationStatus>()
            .map_err(AppError::invalid_request)?;

        let identifier = remove_all_spaces(organisation_identifier);
        let mut organisation = self
            .get_organisation_by_identifier(&identifier)
            .await?
            .ok_or_else(|| AppError::empty_result(format!("Organisation {} not found", identifier)))?;

        let activating = organisation.status == OrganisationStatus::Pending
            && status == OrganisationStatus::Active;

        // Registration happens before the transaction opens
        let registration = match organisation.super_user() {
            Some(super_user) if activating && super_user.user_identifier.is_none() => {
                let user_identifier = self.register_super_user(super_user).await?;
                Some((super_user.id, user_identifier))
            }
            _ => None,
        };

        organisation.name = remove_all_spaces(&request.name);
        organisation.status = status;
        organisation.sra_id = strip(&request.sra_id);
        organisation.company_number = strip(&request.company_number);
        organisation.sra_regulated = parse_sra_regulated(request.sra_regulated.as_deref());
        organisation.company_url = strip(&request.company_url);
        organisation.last_updated = Utc::now();

        let persisted = self
            .persist_update(&organisation, registration.as_ref())
            .await;
        if let (Err(e), Some((_, user_identifier))) = (&persisted, &registration) {
            warn!(
                "User {} of organisation {} was registered but the local update failed: {}",
                user_identifier, organisation.organisation_identifier, e
            );
        }
        persisted?;

        if let Some((user_id, user_identifier)) = registration {
            if let Some(user) = organisation.users.iter_mut().find(|u| u.id == user_id) {
                user.user_identifier = Some(user_identifier);
            }
        }

        info!(
            "Updated organisation {} to status {}",
            organisation.organisation_identifier, organisation.status
        );

        Ok(OrganisationResponse::from(&organisation))
    }

    async fn persist_update(
        &self,
        organisation: &Organisation,
        registration: Option<&(Uuid, String)>,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        OrganisationRepository::new(&mut *tx)
            .update(organisation)
            .await?;

        if let Some((user_id, user_identifier)) = registration {
            ProfessionalUserRepository::new(&mut *tx)
                .set_user_identifier(*user_id, user_identifier)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn register_super_user(&self, super_user: &ProfessionalUser) -> AppResult<String> {
        let request = UserProfileCreationRequest::for_super_user(
            &super_user.email_address,
            &super_user.first_name,
            &super_user.last_name,
            self.user_attribute_service.super_user_roles().to_vec(),
        );

        let response = self.gateway.create_profile(&request).await?;
        match response.idam_id {
            Some(idam_id) if response.is_user_created() => Ok(idam_id),
            _ => Err(AppError::user_profile(format!(
                "User profile service did not register {} (registration response {:?})",
                super_user.email_address, response.idam_registration_response
            ))),
        }
    }

    /// Delete an organisation on behalf of an administrator.
    ///
    /// Rejections of the ACTIVE workflow come back as a response carrying the
    /// status code, not as an error.
    pub async fn delete_organisation(
        &self,
        organisation: &Organisation,
        admin_user_id: &str,
    ) -> AppResult<DeleteOrganisationResponse> {
        match organisation.status {
            OrganisationStatus::Pending => self.delete_locally(organisation, admin_user_id).await,
            OrganisationStatus::Active => {
                let response = self.delete_user_profile(organisation).await?;
                if !response.is_success() {
                    return Ok(response);
                }

                self.delete_locally(organisation, admin_user_id)
                    .await
                    .inspect_err(|e| {
                        warn!(
                            "User profile of organisation {} was deleted but the local delete failed: {}",
                            organisation.organisation_identifier, e
                        )
                    })
            }
            OrganisationStatus::Blocked | OrganisationStatus::Deleted => {
                Err(AppError::empty_result(format!(
                    "Organisation {} in status {} cannot be deleted",
                    organisation.organisation_identifier, organisation.status
                )))
            }
        }
    }

    async fn delete_locally(
        &self,
        organisation: &Organisation,
        admin_user_id: &str,
    ) -> AppResult<DeleteOrganisationResponse> {
        let mut tx = self.pool.begin().await?;
        let deleted = OrganisationRepository::new(&mut *tx)
            .delete_by_id(organisation.id)
            .await?;
        if !deleted {
            return Err(AppError::empty_result(format!(
                "Organisation {} no longer exists",
                organisation.organisation_identifier
            )));
        }
        tx.commit().await?;

        info!(
            "Organisation {} deleted by admin {}",
            organisation.organisation_identifier, admin_user_id
        );

        Ok(DeleteOrganisationResponse::deleted())
    }

    /// Remove the single, not yet active, user of an active organisation from
    /// the user profile service
    async fn delete_user_profile(
        &self,
        organisation: &Organisation,
    ) -> AppResult<DeleteOrganisationResponse> {
        let user_count = {
            let mut conn = self.pool.acquire().await?;
            ProfessionalUserRepository::new(&mut *conn)
                .count_by_organisation_id(organisation.id)
                .await?
        };

        if user_count != 1 {
            return Ok(DeleteOrganisationResponse::new(
                ERROR_CODE_400,
                ERROR_MESSAGE_400_ORG_MORE_THAN_ONE_USER,
            ));
        }

        let Some(user) = organisation.super_user() else {
            return Ok(DeleteOrganisationResponse::new(
                ERROR_CODE_500,
                ERR_MESG_500_ADMIN_NOTFOUNDUP,
            ));
        };

        match self
            .gateway
            .fetch_status_by_email(&user.email_address)
            .await?
        {
            None => Ok(DeleteOrganisationResponse::new(
                ERROR_CODE_500,
                ERR_MESG_500_ADMIN_NOTFOUNDUP,
            )),
            Some(status) if status.is_active() => Ok(DeleteOrganisationResponse::new(
                ERROR_CODE_400,
                ERROR_MESSAGE_400_ADMIN_NOT_PENDING,
            )),
            Some(status) => {
                debug!(
                    "Deleting user profile of organisation {} admin in status {}",
                    organisation.organisation_identifier, status
                );
                let user_identifiers: Vec<String> = user.user_identifier.iter().cloned().collect();
                self.gateway.delete_profiles(&user_identifiers).await
            }
        }
    }
}

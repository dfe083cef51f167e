//! Reconciliation of local users with the user profile service
//!
//! Local user rows carry only what was captured at registration. Names, email,
//! identity status and roles as currently held by the identity system are
//! overlaid here before an organisation is returned to a caller.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::user_profile::UserProfileGateway;
use crate::models::{Organisation, ProfessionalUser, UserProfile};
use crate::utils::AppResult;

fn apply_profile(user: &mut ProfessionalUser, profile: UserProfile) {
    if let Some(first_name) = profile.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = profile.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = profile.email {
        user.email_address = email;
    }
    user.idam_status = profile.idam_status;
    user.roles = profile.roles;
}

/// Keep only the active organisations whose super user is known to the
/// identity system, ordered by the super user's remote identifier.
pub async fn reconcile_active_organisations(
    gateway: &dyn UserProfileGateway,
    organisations: Vec<Organisation>,
) -> AppResult<Vec<Organisation>> {
    let mut by_user_identifier: BTreeMap<String, Organisation> = BTreeMap::new();
    for organisation in organisations {
        match organisation.first_user_identifier().map(str::to_string) {
            Some(user_identifier) => {
                by_user_identifier.insert(user_identifier, organisation);
            }
            None => debug!(
                "Skipping organisation {} without a registered super user",
                organisation.organisation_identifier
            ),
        }
    }

    if by_user_identifier.is_empty() {
        return Ok(Vec::new());
    }

    let user_identifiers: Vec<String> = by_user_identifier.keys().cloned().collect();
    let profiles = gateway
        .fetch_users_by_identifiers(&user_identifiers, false)
        .await?;

    let mut reconciled = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let Some(mut organisation) = by_user_identifier.remove(&profile.user_identifier) else {
            continue;
        };
        if let Some(super_user) = organisation.users.first_mut() {
            apply_profile(super_user, profile);
        }
        reconciled.push(organisation);
    }

    for (user_identifier, organisation) in &by_user_identifier {
        debug!(
            "Dropping organisation {}: user {} not returned by the user profile service",
            organisation.organisation_identifier, user_identifier
        );
    }

    Ok(reconciled)
}

/// Overlay remote profiles onto the given users; unmatched users are unchanged
pub async fn reconcile_users(
    gateway: &dyn UserProfileGateway,
    users: Vec<ProfessionalUser>,
    show_deleted: bool,
) -> AppResult<Vec<ProfessionalUser>> {
    let user_identifiers: Vec<String> = users
        .iter()
        .filter_map(|u| u.user_identifier.clone())
        .collect();

    if user_identifiers.is_empty() {
        return Ok(users);
    }

    let mut profiles: HashMap<String, UserProfile> = gateway
        .fetch_users_by_identifiers(&user_identifiers, show_deleted)
        .await?
        .into_iter()
        .map(|p| (p.user_identifier.clone(), p))
        .collect();

    Ok(users
        .into_iter()
        .map(|mut user| {
            let profile = user
                .user_identifier
                .as_ref()
                .and_then(|id| profiles.remove(id));
            if let Some(profile) = profile {
                apply_profile(&mut user, profile);
            }
            user
        })
        .collect())
}

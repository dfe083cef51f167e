//! Business logic services

pub mod contact_information;
pub mod organisation;
pub mod payment_account;
pub mod reconciliation;
pub mod user_account_map;
pub mod user_attribute;
pub mod user_profile;

pub use contact_information::add_contact_information;
pub use organisation::{IdentifierGenerator, OrganisationService};
pub use payment_account::add_pba_accounts;
pub use reconciliation::{reconcile_active_organisations, reconcile_users};
pub use user_account_map::persist_user_account_map;
pub use user_attribute::UserAttributeService;
pub use user_profile::{UserProfileClient, UserProfileGateway};

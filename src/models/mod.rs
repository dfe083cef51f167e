//! Data models

mod contact_information;
mod organisation;
mod payment_account;
mod request;
mod response;
mod user;
mod user_profile;

pub use contact_information::*;
pub use organisation::*;
pub use payment_account::*;
pub use request::*;
pub use response::*;
pub use user::*;
pub use user_profile::*;

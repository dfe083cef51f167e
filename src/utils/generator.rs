//! Organisation identifier generation

use rand::{distributions::Alphanumeric, Rng};

/// Length of a generated organisation identifier
pub const LENGTH_OF_ORGANISATION_IDENTIFIER: usize = 7;

/// Generate a random upper-case alphanumeric identifier of the given length
pub fn generate_unique_alphanumeric_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

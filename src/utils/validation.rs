//! Input normalization and validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{AppError, AppResult};

/// Regex for payment account (PBA) numbers
static PBA_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)PBA[A-Z0-9]{7}$").unwrap()
});

/// Regex for generated organisation identifiers
static ORGANISATION_IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z0-9]+$").unwrap()
});

/// Remove every whitespace character, including embedded ones
pub fn remove_all_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Trim and collapse internal whitespace runs to a single space
pub fn remove_empty_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the SRA regulated flag; anything other than "true" is false
pub fn parse_sra_regulated(value: Option<&str>) -> bool {
    value
        .map(|v| remove_all_spaces(&v.to_lowercase()) == "true")
        .unwrap_or(false)
}

/// Validate a single PBA number
pub fn validate_pba_number(pba_number: &str) -> bool {
    PBA_NUMBER_REGEX.is_match(pba_number)
}

/// Validate a batch of PBA numbers, failing on the first invalid entry
pub fn check_pba_numbers_are_valid<'a, I>(pba_numbers: I) -> AppResult<()>
where
    I: IntoIterator<Item = &'a String>,
{
    for pba_number in pba_numbers {
        if !validate_pba_number(pba_number) {
            return Err(AppError::invalid_request(format!(
                "PBA number {} is not in the correct format",
                pba_number
            )));
        }
    }
    Ok(())
}

/// Validate an organisation identifier of the expected length
pub fn is_valid_organisation_identifier(identifier: &str, length: usize) -> bool {
    identifier.len() == length && ORGANISATION_IDENTIFIER_REGEX.is_match(identifier)
}

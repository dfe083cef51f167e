//! Payment account management for organisations

use std::collections::{BTreeSet, HashSet};

use sqlx::SqliteConnection;

use crate::db::PaymentAccountRepository;
use crate::models::{Organisation, PaymentAccount};
use crate::utils::validation::check_pba_numbers_are_valid;
use crate::utils::AppResult;

/// Persist the given PBA numbers against the organisation and attach them to it.
///
/// Unless `pbas_validated` is set, the whole batch is validated before anything
/// is written, so one bad number means no accounts at all.
pub async fn add_pba_accounts(
    conn: &mut SqliteConnection,
    pba_numbers: Option<&HashSet<String>>,
    organisation: &mut Organisation,
    pbas_validated: bool,
) -> AppResult<()> {
    let Some(pba_numbers) = pba_numbers else {
        return Ok(());
    };

    if !pbas_validated {
        check_pba_numbers_are_valid(pba_numbers)?;
    }

    // Numbers differing only in case are the same account
    let pba_numbers: BTreeSet<String> = pba_numbers.iter().map(|p| p.to_uppercase()).collect();

    let mut repo = PaymentAccountRepository::new(conn);
    for pba_number in &pba_numbers {
        let account = PaymentAccount::new(organisation.id, pba_number);
        repo.insert(&account).await?;
        organisation.add_payment_account(account);
    }

    Ok(())
}

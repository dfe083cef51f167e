//! Links between users and their organisation's payment accounts

use sqlx::SqliteConnection;

use crate::db::ProfessionalUserRepository;
use crate::models::{PaymentAccount, ProfessionalUser, UserAccountMap};
use crate::utils::AppResult;

pub async fn persist_user_account_map(
    conn: &mut SqliteConnection,
    user: &ProfessionalUser,
    payment_accounts: &[PaymentAccount],
) -> AppResult<()> {
    if payment_accounts.is_empty() {
        return Ok(());
    }

    let mut repo = ProfessionalUserRepository::new(conn);
    for account in payment_accounts {
        repo.insert_account_map(&UserAccountMap {
            professional_user_id: user.id,
            payment_account_id: account.id,
            default_pba: false,
        })
        .await?;
    }

    Ok(())
}

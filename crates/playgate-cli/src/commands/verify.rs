//! `playgate verify [account-id]`: redeem an emailed code.

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::commands::{api_error, prompt, session, AccountView};

/// Run `playgate verify`, prompting for the 6-digit code.
///
/// # Errors
///
/// Returns an error if no account id is given or remembered, or if the API
/// rejects the code.
pub async fn run_verify(account_id: Option<Uuid>) -> Result<()> {
    let (saved, gateway_url) = session();
    let account_id = account_id
        .or_else(|| saved.as_ref().and_then(|c| c.account_id))
        .context("no account to verify; pass an account id or run `playgate register` first")?;

    let code = prompt("Enter the 6-digit code from your email: ")?;

    let resp = reqwest::Client::new()
        .post(format!("{gateway_url}/v1/accounts/{account_id}/verify"))
        .json(&serde_json::json!({"code": code}))
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }

    let account: AccountView = resp.json().await?;
    println!("{} is verified.", account.email);
    Ok(())
}

//! `playgate resend [email]`: request a fresh verification code.

use anyhow::{Context, Result};

use crate::commands::{api_error, session, AccountView};
use crate::config::{default_config_path, save_config, CliConfig};

/// Run `playgate resend`. The previous code stops working once the new one is
/// issued.
///
/// # Errors
///
/// Returns an error if no email is given or remembered, or if the API refuses
/// to issue a new code.
pub async fn run_resend(email: Option<String>) -> Result<()> {
    let (saved, gateway_url) = session();
    let email = email
        .or_else(|| saved.as_ref().and_then(|c| c.email.clone()))
        .context("no email given; pass one or run `playgate register` first")?;

    let resp = reqwest::Client::new()
        .post(format!("{gateway_url}/v1/accounts/verification-code"))
        .json(&serde_json::json!({"email": email}))
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }

    let account: AccountView = resp.json().await?;
    save_config(
        &CliConfig {
            gateway_url,
            account_id: Some(account.id),
            email: Some(account.email.clone()),
        },
        &default_config_path(),
    )?;
    println!("New verification code sent to {}.", account.email);
    Ok(())
}

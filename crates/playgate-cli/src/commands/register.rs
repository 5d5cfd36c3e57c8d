//! `playgate register <name> <email>`: create an account and request its code.

use anyhow::Result;
use log::debug;

use crate::commands::{api_error, prompt, session, AccountView};
use crate::config::{default_config_path, save_config, CliConfig};

/// Run `playgate register`. Prompts for a password, creates the account and
/// remembers it so `playgate verify` can omit the account id.
///
/// If the API accepted the account but could not deliver the code, the account
/// is still remembered and `playgate resend` can request a new one.
///
/// # Errors
///
/// Returns an error if the gateway is unreachable or rejects the registration.
pub async fn run_register(name: &str, email: &str) -> Result<()> {
    let (_, gateway_url) = session();
    let password = prompt("Password: ")?;

    let resp = reqwest::Client::new()
        .post(format!("{gateway_url}/v1/accounts"))
        .json(&serde_json::json!({"name": name, "email": email, "password": password}))
        .send()
        .await?;
    debug!("register responded {}", resp.status());

    if resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
        let err = api_error(resp).await;
        save_config(
            &CliConfig {
                gateway_url,
                account_id: None,
                email: Some(email.trim().to_lowercase()),
            },
            &default_config_path(),
        )?;
        println!("Account created but the code was not sent. Run `playgate resend` to retry.");
        return Err(err);
    }
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
    println!(
        "Registered {} <{}> ({}). A verification code is on its way.",
        account.name, account.email, account.id
    );
    println!("Run `playgate verify` once it arrives.");
    Ok(())
}

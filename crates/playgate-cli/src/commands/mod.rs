use anyhow::{anyhow, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::{default_config_path, load_config, resolve_gateway_url, CliConfig};

/// `playgate register`.
pub mod register;
/// `playgate resend`.
pub mod resend;
/// `playgate verify`.
pub mod verify;

/// Account as returned by the API.
#[derive(Debug, Deserialize)]
pub struct AccountView {
    /// Account UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Normalised email address.
    pub email: String,
    /// Whether the email has been verified.
    pub verified: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Saved config (if any) and the gateway URL to talk to.
pub(crate) fn session() -> (Option<CliConfig>, String) {
    let saved = load_config(&default_config_path()).ok();
    let url = resolve_gateway_url(std::env::var("PLAYGATE_URL").ok(), saved.as_ref());
    (saved, url)
}

/// Print `label` and read one trimmed line from stdin.
pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut line = String::new();
    std::io::BufRead::read_line(&mut std::io::stdin().lock(), &mut line)?;
    Ok(line.trim().to_owned())
}

/// Turn a non-2xx response into an error carrying the API's message.
pub(crate) async fn api_error(resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    describe_error(status, &text)
}

fn describe_error(status: reqwest::StatusCode, text: &str) -> anyhow::Error {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => anyhow!("{} ({}, {status})", body.error.message, body.error.code),
        Err(_) => anyhow!("request failed: {status}"),
    }
}

//! Account commands: signup, login and logout.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_dashboard, print_toasts};
use crate::config::Config;
use crate::error::Result;
use crate::remote::{AuthApi, RestClient};
use crate::session::CookieJar;
use crate::utils::{require_non_empty, value_or_prompt};

/// Create an account
pub async fn cmd_signup(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let name = value_or_prompt(name, "Name")?;
    let email = value_or_prompt(email, "Email")?;
    let password = value_or_prompt(password, "Password")?;
    require_non_empty(&name, "Name")?;
    require_non_empty(&email, "Email")?;
    require_non_empty(&password, "Password")?;

    let client = RestClient::from_config(&Config::load()?)?;
    client.register(name.trim(), email.trim(), &password).await?;
    tracing::debug!("registered {}", email.trim());

    CommandOutput::new(json!({
        "action": "registered",
        "email": email.trim(),
    }))
    .with_text(
        "You are registered successfully, please login to continue."
            .green()
            .to_string(),
    )
    .print(json)
}

/// Log in and store the session cookie
pub async fn cmd_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = value_or_prompt(email, "Email")?;
    let password = value_or_prompt(password, "Password")?;
    require_non_empty(&email, "Email")?;
    require_non_empty(&password, "Password")?;

    let client = RestClient::from_config(&Config::load()?)?;
    let response = client.login(email.trim(), &password).await?;
    let session = response.into_session();

    let jar = CookieJar::new(Config::session_path()?);
    jar.save(&session)?;

    let name = session.user().map(|u| u.name.clone()).unwrap_or_default();
    CommandOutput::new(json!({
        "action": "logged_in",
        "user": session.user(),
    }))
    .with_text(format!("WELCOME {}!", name.to_uppercase()).bold().to_string())
    .print(json)
}

/// End the session on the server and forget it locally
pub async fn cmd_logout(json: bool) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let result = dashboard.logout().await;
    print_toasts(dashboard.take_toasts(), result.as_ref().err(), json);
    result?;

    CommandOutput::new(json!({ "action": "logged_out" }))
        .with_text(String::new())
        .print(json)
}

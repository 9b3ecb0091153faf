//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config set`: Set a configuration value
//! - `config path`: Print where the config and session files live

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;
use crate::session::{CookieJar, SessionProvider};

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let jar = CookieJar::new(Config::session_path()?);
    let session = jar.current()?;
    let user = session.as_ref().and_then(|s| s.user());

    let json_output = json!({
        "api_url": config.api_url(),
        "request_timeout_secs": config.request_timeout_secs,
        "logged_in": session.is_some(),
        "user": user,
        "config_file": Config::config_path()?.to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    text.push_str(&format!("{}: {}\n", "api_url".cyan(), config.api_url()));

    let timeout = match config.request_timeout_secs {
        Some(secs) => format!("{secs}s"),
        None => "not configured".dimmed().to_string(),
    };
    text.push_str(&format!("{}: {}\n\n", "request_timeout_secs".cyan(), timeout));

    let status = match user {
        Some(user) if !user.name.is_empty() => format!("logged in as {}", user.name).green().to_string(),
        _ if session.is_some() => "logged in".green().to_string(),
        _ => "not logged in".dimmed().to_string(),
    };
    text.push_str(&format!("{}: {}\n\n", "session".cyan(), status));
    text.push_str(
        &format!("Config file: {}", Config::config_path()?.display())
            .dimmed()
            .to_string(),
    );

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), value))
    .print(json)
}

/// Print the config and session file locations
pub fn cmd_config_path(json: bool) -> Result<()> {
    let config_path = Config::config_path()?;
    let session_path = Config::session_path()?;

    CommandOutput::new(json!({
        "config_file": config_path.to_string_lossy(),
        "session_file": session_path.to_string_lossy(),
    }))
    .with_text(format!(
        "{}\n{}",
        config_path.display(),
        session_path.display()
    ))
    .print(json)
}

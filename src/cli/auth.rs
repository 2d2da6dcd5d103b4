//! Handlers for `login`, `logout`, and `whoami`.

use std::io::Write;

use chrono::Utc;

use crate::api::ApiClient;
use crate::auth::{
    require_credential, Credential, CredentialStore, DeviceAuthClient, FileCredentialStore,
};
use crate::config::AppConfig;
use crate::error::CoremindError;

use super::{CommandOutcome, LoginArgs, WhoamiArgs};

/// Handle `coremind login`.
pub async fn handle_login(
    config: &AppConfig,
    args: &LoginArgs,
) -> Result<CommandOutcome, CoremindError> {
    let auth_config = config
        .auth_config(args.server_url.as_deref(), args.client_id.as_deref())
        .ok_or_else(|| {
            CoremindError::Configuration(
                "client id is required; set COREMIND_CLIENT_ID or pass --client-id".to_string(),
            )
        })?;

    let store = FileCredentialStore::new(config.config_dir.clone());
    if let Some(existing) = store.load()? {
        if !existing.is_expired(Utc::now())
            && !confirm("You are already logged in. Re-authenticate?", false)?
        {
            println!("Login cancelled.");
            return Ok(CommandOutcome::Cancelled);
        }
    }

    let client = DeviceAuthClient::new(auth_config);
    let session = client.request_device_code().await?;

    println!("Device authorization required");
    println!("🔗 Visit: {}", session.verification_target());
    println!("📋 Enter code: {}", session.user_code);

    if confirm("Open browser automatically?", true)? {
        if let Err(err) = open::that(session.verification_target()) {
            // Not fatal; the user still has the URL on screen.
            tracing::warn!(error = %err, "could not open browser");
        }
    }

    let minutes = (session.expires_at - Utc::now()).num_minutes().max(0);
    println!("⏳ Waiting for authorization... (expires in {minutes} minutes)");

    let grant = tokio::select! {
        result = client.poll_for_token(&session) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\nLogin interrupted.");
            return Ok(CommandOutcome::Cancelled);
        }
    };

    let credential = Credential::from_grant(grant, Utc::now());
    store.save(&credential)?;
    println!("✅ Login successful; credential stored.");
    Ok(CommandOutcome::Success)
}

/// Handle `coremind logout`.
pub fn handle_logout(config: &AppConfig) -> Result<CommandOutcome, CoremindError> {
    let store = FileCredentialStore::new(config.config_dir.clone());
    store.clear()?;
    println!("Logged out.");
    Ok(CommandOutcome::Success)
}

/// Handle `coremind whoami`.
pub async fn handle_whoami(
    config: &AppConfig,
    args: &WhoamiArgs,
) -> Result<CommandOutcome, CoremindError> {
    let store = FileCredentialStore::new(config.config_dir.clone());
    let credential = require_credential(&store)?;

    let api = ApiClient::new(args.server_url.as_deref().unwrap_or(&config.server_url));
    let identity = api.fetch_identity(&credential).await?;

    println!("{} <{}>", identity.user.name, identity.user.email);
    println!(
        "Session {} expires {}",
        identity.session.id,
        identity.session.expires_at.format("%Y-%m-%d %H:%M")
    );
    Ok(CommandOutcome::Success)
}

/// Line-based yes/no prompt. Empty input takes the default; anything other
/// than y/yes is a no.
pub(crate) fn confirm(prompt: &str, default_yes: bool) -> std::io::Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    print!("{prompt} [{hint}]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(match answer.as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
    })
}

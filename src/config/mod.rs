//! Layered configuration: defaults < config file < environment < CLI flags.
//!
//! The core auth and storage types never read globals; the CLI layer loads
//! an [`AppConfig`] and hands explicit settings down.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::auth::{default_config_dir, AuthConfig};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_SCOPE: &str = "openid profile email";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const CONFIG_FILE: &str = "config.toml";

/// Optional on-disk settings (`~/.coremind/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    server_url: Option<String>,
    client_id: Option<String>,
    scope: Option<String>,
    model: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_url: String,
    pub client_id: Option<String>,
    pub scope: String,
    pub model: String,
    pub gemini_api_key: Option<String>,
    pub config_dir: PathBuf,
}

impl AppConfig {
    /// Load from the default per-user config directory.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::load_from(default_config_dir())
    }

    /// Load with an explicit config directory (used by tests).
    pub fn load_from(config_dir: PathBuf) -> Self {
        let file = read_config_file(&config_dir.join(CONFIG_FILE));
        Self {
            server_url: env_var("COREMIND_SERVER_URL")
                .or(file.server_url)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            client_id: env_var("COREMIND_CLIENT_ID").or(file.client_id),
            scope: env_var("COREMIND_SCOPE")
                .or(file.scope)
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            model: env_var("COREMIND_MODEL")
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_key: env_var("GEMINI_API_KEY"),
            config_dir,
        }
    }

    /// Build device-authorization settings, applying CLI overrides.
    ///
    /// Returns `None` when no client id is available from any layer.
    pub fn auth_config(
        &self,
        server_url: Option<&str>,
        client_id: Option<&str>,
    ) -> Option<AuthConfig> {
        let client_id = client_id
            .map(str::to_string)
            .or_else(|| self.client_id.clone())?;
        Some(AuthConfig {
            server_url: server_url.unwrap_or(&self.server_url).to_string(),
            client_id,
            scope: self.scope.clone(),
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn read_config_file(path: &Path) -> ConfigFile {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return ConfigFile::default(),
    };
    match toml::from_str(&raw) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "config file unparseable; ignoring");
            ConfigFile::default()
        }
    }
}

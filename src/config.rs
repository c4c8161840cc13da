//! Application-level configuration loading: known accounts and seeded minigames.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::{minigame::CreateMinigameRequest, user::Role};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "LUCKY_DRAW_CONFIG_PATH";

/// Account accepted by the bearer-token check.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Bearer token presented by the client.
    pub token: String,
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
}

impl UserAccount {
    pub fn new(
        token: impl Into<String>,
        id: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            token: token.into(),
            id: id.into(),
            display_name: display_name.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub users: Vec<UserAccount>,
    #[serde(default)]
    pub minigames: Vec<CreateMinigameRequest>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in development accounts.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        users = config.users.len(),
                        minigames = config.minigames.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in development accounts"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document, dropping seeded minigames that fail validation.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config = serde_json::from_str::<Self>(contents)?;
        config.minigames.retain(|seed| match seed.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(name = %seed.name, error = %err, "skipping invalid minigame seed");
                false
            }
        });
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            users: vec![
                UserAccount::new("dev-admin-token", "admin", "Ban tổ chức", Role::Admin),
                UserAccount::new("dev-player-token", "player", "Thí sinh", Role::Player),
            ],
            minigames: Vec::new(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

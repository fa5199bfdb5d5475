use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the stored API read token.
pub const TOKEN_ENV_VAR: &str = "CINELIST_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_read_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_read_token_saved_at: Option<DateTime<Utc>>,
}

/// The API read token, kept in `credentials.toml` next to the config file.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    credentials: Credentials,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: Credentials::default(),
        }
    }

    /// Read the file if it exists. A missing file leaves the store empty.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        self.credentials = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(&self.credentials)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// The stored token; blank values count as missing.
    pub fn api_token(&self) -> Option<&str> {
        self.credentials
            .api_read_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    pub fn api_token_saved_at(&self) -> Option<DateTime<Utc>> {
        self.credentials.api_read_token_saved_at
    }

    pub fn set_api_token(&mut self, token: String) {
        self.credentials.api_read_token = Some(token);
        self.credentials.api_read_token_saved_at = Some(Utc::now());
    }

    pub fn clear_api_token(&mut self) {
        self.credentials = Credentials::default();
    }

    /// Token to attach to requests: the environment wins over the stored value.
    pub fn resolve_api_token(&self) -> Option<String> {
        self.resolve_with(std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn resolve_with(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api_token().map(str::to_string))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

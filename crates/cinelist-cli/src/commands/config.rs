use super::prompts;
use super::ui::{self, new_table};
use crate::output::Output;
use cinelist_config::{Config, CredentialStore, PathManager, TOKEN_ENV_VAR};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use serde_json::json;

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::Init { force, defaults } => init_config(force, defaults, output),
        crate::ConfigCommands::Token { token, clear } => configure_token(token, clear, output),
        crate::ConfigCommands::Path => show_paths(output),
    }
}

fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_file.display(), e))
}

fn load_credentials(paths: &PathManager) -> Result<CredentialStore> {
    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {:#}", e))?;
    Ok(credentials)
}

/// Where the effective token comes from.
fn token_source(credentials: &CredentialStore) -> &'static str {
    let from_env = std::env::var(TOKEN_ENV_VAR).is_ok_and(|t| !t.trim().is_empty());
    if from_env {
        "environment"
    } else if credentials.api_token().is_some() {
        "credentials file"
    } else {
        "not set"
    }
}

fn section(title: &str, rows: &[(&str, String)]) -> Table {
    let mut table = new_table(&[title, ""]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let credentials = load_credentials(&paths)?;

    let token = credentials.resolve_api_token().unwrap_or_default();
    let token_display = if full { token.clone() } else { mask_string(&token) };
    let saved_at = credentials
        .api_token_saved_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    let app_error = if config.api.app_error.enabled {
        format!("{} >= {}", config.api.app_error.field, config.api.app_error.min)
    } else {
        "disabled".to_string()
    };
    let max_body = config
        .api
        .max_body_bytes
        .map(|b| format!("{} bytes", b))
        .unwrap_or_else(|| "unlimited".to_string());

    if !output.is_human() {
        output.json(&json!({
            "configFile": paths.config_file(),
            "exists": paths.config_file().exists(),
            "config": config,
            "token": {
                "value": token_display,
                "source": token_source(&credentials),
                "savedAt": credentials.api_token_saved_at(),
            },
        }));
        return Ok(());
    }

    if !paths.config_file().exists() {
        output.warn(format!(
            "No configuration file at {}, showing defaults. Run 'cinelist config init' to create one.",
            paths.config_file().display()
        ));
    }

    output.table(&section(
        "API",
        &[
            ("Base URL", config.api.base_url.clone()),
            ("Image base URL", config.api.image_base_url.clone()),
            ("Timeout", format!("{} ms", config.api.timeout_ms)),
            ("Max body size", max_body),
            ("Language", config.api.language.clone()),
            ("Region", config.api.region.clone()),
            ("Application error rule", app_error),
        ],
    ));
    output.table(&section(
        "Discover",
        &[
            ("Popular minimum votes", config.discover.popular_min_votes.to_string()),
            ("Upcoming window", format!("{} months", config.discover.upcoming_months)),
            ("Release types", config.discover.release_types.clone()),
        ],
    ));
    output.table(&section(
        "Storage",
        &[
            ("Namespace", config.storage.namespace.clone()),
            ("Version", config.storage.version.to_string()),
            ("Directory", paths.storage_dir().display().to_string()),
        ],
    ));
    output.table(&section(
        "Account",
        &[
            ("Account ID", config.account_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())),
            ("API token", token_display),
            ("Token source", token_source(&credentials).to_string()),
            ("Token saved", saved_at),
        ],
    ));
    Ok(())
}

fn init_config(force: bool, defaults: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {:#}", e))?;

    let mut config = Config::default();
    if !defaults && ui::is_interactive() {
        config.api.language = prompts::prompt_string("Language", Some(&config.api.language))?;
        config.api.region = prompts::prompt_string("Region", Some(&config.api.region))?;
        let account = prompts::prompt_string("Account ID (leave empty to skip)", Some(""))?;
        config.account_id = parse_account_id(&account)?;
    }

    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration: {:#}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {:#}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    Ok(())
}

fn parse_account_id(input: &str) -> Result<Option<u64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| eyre!("Account ID must be a number, got '{}'", trimmed))
}

fn configure_token(token: Option<String>, clear: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut credentials = load_credentials(&paths)?;

    if clear {
        credentials.clear_api_token();
        credentials
            .save()
            .map_err(|e| eyre!("Failed to save credentials: {:#}", e))?;
        output.success("API token removed");
        return Ok(());
    }

    let token = match token {
        Some(token) => token,
        None if ui::is_interactive() => prompts::prompt_secret("API read access token")?,
        None => return Err(eyre!("No token given. Pass --token or run in a terminal to be prompted.")),
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        output.warn("Empty token, nothing saved");
        return Ok(());
    }

    credentials.set_api_token(token);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {:#}", e))?;
    output.success(format!("API token saved to {}", paths.credentials_file().display()));

    if std::env::var(TOKEN_ENV_VAR).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved token", TOKEN_ENV_VAR));
    }
    Ok(())
}

fn show_paths(output: &Output) -> Result<()> {
    let paths = PathManager::default();

    if !output.is_human() {
        output.json(&json!({
            "config": paths.config_file(),
            "credentials": paths.credentials_file(),
            "storage": paths.storage_dir(),
            "log": paths.log_file(),
        }));
        return Ok(());
    }

    output.table(&section(
        "Paths",
        &[
            ("Config", paths.config_file().display().to_string()),
            ("Credentials", paths.credentials_file().display().to_string()),
            ("Storage", paths.storage_dir().display().to_string()),
            ("Log file", paths.log_file().display().to_string()),
        ],
    ));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    match chars.len() {
        0 => "<not set>".to_string(),
        n if n <= 8 => "*".repeat(n),
        n => format!(
            "{}***{}",
            chars[..4].iter().collect::<String>(),
            chars[n - 4..].iter().collect::<String>()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJh***load");
    }

    #[test]
    fn test_parse_account_id() {
        assert_eq!(parse_account_id("  ").unwrap(), None);
        assert_eq!(parse_account_id(" 20321280 ").unwrap(), Some(20321280));
        assert!(parse_account_id("me").is_err());
    }
}

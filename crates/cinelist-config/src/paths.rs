use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable pointing at the container layout root.
pub const BASE_PATH_ENV_VAR: &str = "CINELIST_BASE_PATH";

/// Root of the container layout: `CINELIST_BASE_PATH`, or `/app`.
pub fn container_base_path() -> PathBuf {
    std::env::var_os(BASE_PATH_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/app"))
}

/// On-disk layout. Config and credentials sit at the root; the wishlist blob
/// lives under `data/storage` and rotated logs under `logs`.
#[derive(Debug, Clone)]
pub struct PathManager {
    root: PathBuf,
}

impl PathManager {
    /// Platform config directory, e.g. `~/.config/cinelist` on Linux.
    pub fn new() -> Result<Self> {
        let root = dirs::config_dir()
            .context("Could not determine the platform config directory")?
            .join("cinelist");
        Ok(Self { root })
    }

    pub fn with_base(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir().join("storage")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join("credentials.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir().join("cinelist.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [self.root.clone(), self.log_dir(), self.storage_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

impl Default for PathManager {
    /// The container layout when its root exists (images create it), else the platform one.
    fn default() -> Self {
        let container = container_base_path();
        if container.exists() {
            return Self::with_base(container);
        }
        Self::new().unwrap_or_else(|_| Self::with_base(container))
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from `~/.config/pinfetch/config.toml` (or `--config`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PinfetchConfig {
    /// Submodule name as it appears in `.gitmodules` (`submodule.<name>.url`).
    pub component: String,
    /// Submodule checkout path, relative to the repository root.
    pub submodule_path: String,
    /// Artifact names are `<artifact_prefix>-<commit>-<platform>`.
    pub artifact_prefix: String,
    /// REST API root of the CI provider.
    pub api_base_url: String,
    /// Environment variable holding the access token.
    pub token_env: String,
    pub user_agent: String,
    /// Where the downloaded archive is written, relative to the repository root.
    pub download_path: PathBuf,
    /// Directory the archive is unpacked into, relative to the repository root.
    pub output_dir: PathBuf,
    /// Gzip-tar expected inside an outer zip, relative to `output_dir`.
    pub inner_archive: PathBuf,
    /// Connect timeout in seconds. None = no limit.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds. None = no limit.
    pub timeout_secs: Option<u64>,
}

impl Default for PinfetchConfig {
    fn default() -> Self {
        Self {
            component: "mailsync".to_string(),
            submodule_path: "mailsync".to_string(),
            artifact_prefix: "mailsync".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            user_agent: concat!("pinfetch/", env!("CARGO_PKG_VERSION")).to_string(),
            download_path: PathBuf::from("app/mailsync.tar.gz"),
            output_dir: PathBuf::from("app"),
            inner_archive: PathBuf::from("mailsync.tar.gz"),
            connect_timeout_secs: None,
            timeout_secs: None,
        }
    }
}

impl PinfetchConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Absolute download path under `repo_root`.
    pub fn download_path_in(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.download_path)
    }

    /// Absolute output directory under `repo_root`.
    pub fn output_dir_in(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.output_dir)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pinfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PinfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PinfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path. Missing keys take defaults.
pub fn load_from(path: &Path) -> Result<PinfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: PinfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

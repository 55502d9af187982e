use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::reminder::soft_delete::DEFAULT_GRACE;
use crate::theme::{Theme, ThemeConfig};

const APP_DIR: &str = "reminder-tui";

/// `config.toml` as written by the user. Every field is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    undo_seconds: Option<u64>,
    log_level: Option<String>,
    outbox: Option<PathBuf>,
    #[serde(default)]
    theme: ThemeConfig,
}

/// Resolved settings with defaults applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub undo_grace: Duration,
    pub log_level: String,
    pub outbox: PathBuf,
    pub theme: Theme,
}

impl Settings {
    /// Load from the user's config directory. A missing file yields defaults;
    /// a file that does not parse is an error.
    pub fn load() -> Result<Self> {
        let data_root = dirs::data_dir().ok_or_else(|| eyre!("no data directory on this platform"))?;
        let default_data = data_root.join(APP_DIR);
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path, default_data),
            _ => Self::parse("", default_data),
        }
    }

    fn from_file(path: &Path, default_data: PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        Self::parse(&content, default_data).wrap_err_with(|| format!("in {}", path.display()))
    }

    fn parse(content: &str, default_data: PathBuf) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).wrap_err("invalid config")?;

        let data_dir = file.data_dir.unwrap_or(default_data);
        let undo_grace = file
            .undo_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_GRACE);
        if undo_grace.is_zero() {
            return Err(eyre!("undo_seconds must be at least 1"));
        }
        let outbox = file
            .outbox
            .unwrap_or_else(|| data_dir.join("outbox.jsonl"));

        Ok(Self {
            undo_grace,
            log_level: file.log_level.unwrap_or_else(|| "info".to_string()),
            outbox,
            theme: file.theme.into_theme(),
            data_dir,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

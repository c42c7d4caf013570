use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_VERSION: u64 = 1;

fn default_week_start() -> Weekday {
    Weekday::Sun
}

fn default_sign_in_timeout_secs() -> u64 {
    120
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct DaybookConfig {
    /// First column of the month grid.
    pub week_start: Weekday,
    /// How long an identity provider gets to finish its sign-in flow.
    pub sign_in_timeout_secs: u64,
    pub debug_logging: bool,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            sign_in_timeout_secs: default_sign_in_timeout_secs(),
            debug_logging: false,
        }
    }
}

impl DaybookConfig {
    /// `~/.config/daybook/v1/config.json` on Linux.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("daybook")
            .join(format!("v{}", CONFIG_VERSION))
            .join("config.json")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Missing or unreadable files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    pub fn sign_in_timeout(&self) -> Duration {
        Duration::from_secs(self.sign_in_timeout_secs.max(1))
    }
}

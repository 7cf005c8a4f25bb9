use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::args::ColorMode;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

impl From<ConfigColorMode> for ColorMode {
    fn from(mode: ConfigColorMode) -> Self {
        match mode {
            ConfigColorMode::Auto => ColorMode::Auto,
            ConfigColorMode::Always => ColorMode::Always,
            ConfigColorMode::Never => ColorMode::Never,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) compact: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) breakdown: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    /// Model store database path
    #[serde(default)]
    pub(crate) db: Option<PathBuf>,
}

impl Config {
    /// Load the first config file that parses. Runs before logging is set up.
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/llmledger/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("llmledger").join("config.toml"));
        }

        // 2. macOS Application Support: ~/Library/Application Support/llmledger/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let macos_path = config_dir.join("llmledger").join("config.toml");
            if !paths.contains(&macos_path) {
                paths.push(macos_path);
            }
        }

        // 3. Home directory: ~/.llmledger.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".llmledger.toml"));
        }

        paths
    }

    /// Default model store location: `<data dir>/llmledger/models.db`
    pub(crate) fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("llmledger")
            .join("models.db")
    }
}

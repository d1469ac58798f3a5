use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Relative location of a history database under the user's profile
/// directory, one entry per OS. Segments are separated with `/`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HistoryPathConfig {
    pub windows: Option<String>,
    pub macos: Option<String>,
    pub linux: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    pub name: String,
    pub history_path: HistoryPathConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub window_secs: i64,
    pub temp_prefix: String,
    pub browsers: Vec<BrowserConfig>,
}

impl HistoryPathConfig {
    pub fn for_os(&self, os: &str) -> Option<&str> {
        match os {
            "windows" => self.windows.as_deref(),
            "macos" => self.macos.as_deref(),
            "linux" => self.linux.as_deref(),
            _ => None,
        }
    }
}

impl BrowserConfig {
    /// Candidate history database path under `profile_dir` for `os`.
    /// Existence is not checked here.
    pub fn history_path(&self, profile_dir: &Path, os: &str) -> Option<PathBuf> {
        let relative = self.history_path.for_os(os)?;
        let mut path = profile_dir.to_path_buf();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        Some(path)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p).with_context(|| format!("reading config {}", p.display()))?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let config: Config = serde_yaml::from_slice(&bytes)?;
    validate(&config)?;
    Ok(config)
}

/// Checked on load; call again after applying CLI overrides.
pub fn validate(config: &Config) -> Result<()> {
    if config.window_secs < 0 {
        bail!("window_secs must not be negative (got {})", config.window_secs);
    }
    if config.temp_prefix.trim().is_empty() {
        bail!("temp_prefix must not be empty");
    }
    if let Some(browser) = config.browsers.iter().find(|b| b.name.trim().is_empty()) {
        bail!("browser entry with empty name: {:?}", browser.history_path);
    }
    Ok(())
}

/// Keep only the browsers named in `names` (case-insensitive). Returns the
/// names that matched nothing.
pub fn filter_browsers(config: &mut Config, names: Option<&[String]>) -> Vec<String> {
    let Some(names) = names else {
        return Vec::new();
    };
    let unknown = names
        .iter()
        .filter(|n| !config.browsers.iter().any(|b| b.name.eq_ignore_ascii_case(n)))
        .cloned()
        .collect();
    config
        .browsers
        .retain(|b| names.iter().any(|n| b.name.eq_ignore_ascii_case(n)));
    unknown
}

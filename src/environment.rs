use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("user profile directory could not be resolved")]
    ProfileDir,
    #[error("temporary directory could not be resolved")]
    TempDir,
}

/// Platform directory lookups the pipeline depends on.
pub trait Environment {
    fn profile_dir(&self) -> Result<PathBuf, EnvError>;
    fn temp_dir(&self) -> Result<PathBuf, EnvError>;

    /// OS key used to pick a browser's history path from config.
    fn os(&self) -> &str {
        std::env::consts::OS
    }
}

/// Real lookups: the home directory from `dirs`, the temp directory from std.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn profile_dir(&self) -> Result<PathBuf, EnvError> {
        dirs::home_dir()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(EnvError::ProfileDir)
    }

    fn temp_dir(&self) -> Result<PathBuf, EnvError> {
        let dir = std::env::temp_dir();
        if dir.as_os_str().is_empty() {
            return Err(EnvError::TempDir);
        }
        Ok(dir)
    }
}

/// Injected paths. A `None` entry makes the matching lookup fail.
#[derive(Debug, Clone)]
pub struct FixedEnvironment {
    pub profile: Option<PathBuf>,
    pub temp: Option<PathBuf>,
    pub os: String,
}

impl FixedEnvironment {
    pub fn new(profile: Option<PathBuf>, temp: Option<PathBuf>) -> Self {
        Self {
            profile,
            temp,
            os: std::env::consts::OS.to_string(),
        }
    }

    pub fn with_os(mut self, os: &str) -> Self {
        self.os = os.to_string();
        self
    }
}

impl Environment for FixedEnvironment {
    fn profile_dir(&self) -> Result<PathBuf, EnvError> {
        self.profile.clone().ok_or(EnvError::ProfileDir)
    }

    fn temp_dir(&self) -> Result<PathBuf, EnvError> {
        self.temp.clone().ok_or(EnvError::TempDir)
    }

    fn os(&self) -> &str {
        &self.os
    }
}

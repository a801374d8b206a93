//! # File Configuration
//!
//! Re-reads the YAML configuration on every command so edits to the app catalogue
//! take effect without a restart.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::traits::ConfigProvider;

pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigProvider for FileConfig {
    fn load(&self) -> Result<AppConfig> {
        AppConfig::load(&self.path)
    }
}

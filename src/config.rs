//! Run configuration loaded from an INI file.
//!
//! ```ini
//! [Paths]
//! database = users.db
//!
//! [Data]
//! year = 2023
//! ```

use crate::cutoff::Cutoff;
use config::{Config as ConfigLoader, File, FileFormat};
use eyre::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(alias = "Paths")]
    pub paths: PathsConfig,
    #[serde(alias = "Data")]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// SQLite file holding imported users
    pub database: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Four-digit cutoff year
    pub year: String,
}

impl Config {
    /// Load configuration from an INI file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = ConfigLoader::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = config
            .try_deserialize()
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        // Reject a bad year before any work is done
        config.cutoff()?;

        Ok(config)
    }

    /// Cutoff built from `[Data] year`
    pub fn cutoff(&self) -> Result<Cutoff> {
        Cutoff::from_year(&self.data.year)
    }
}

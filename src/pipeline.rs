// End-to-end run: open store, import the export file, write the downgrade file

use crate::config::Config;
use crate::cutoff::Cutoff;
use crate::export::{self, Quoting};
use crate::import;
use crate::store::UserStore;
use eyre::Result;
use std::path::PathBuf;
use tracing::info;

/// Everything a single run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// SQLite file holding imported users
    pub database: PathBuf,
    pub cutoff: Cutoff,
    /// User export CSV to import
    pub input: PathBuf,
    /// Downgrade file to write
    pub output: PathBuf,
    pub quoting: Quoting,
}

impl RunConfig {
    pub fn new(config: &Config, input: impl Into<PathBuf>, output: impl Into<PathBuf>, quoting: Quoting) -> Result<Self> {
        Ok(Self {
            database: config.paths.database.clone(),
            cutoff: config.cutoff()?,
            input: input.into(),
            output: output.into(),
            quoting,
        })
    }
}

/// Counts reported after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub imported: usize,
    pub exported: usize,
}

/// Run the three stages in order
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    info!(database = %config.database.display(), "Opening store");
    let mut store = UserStore::open(&config.database)?;

    let imported = import::import_users(&mut store, &config.input)?;
    let exported = export::export_inactive(&store, &config.output, &config.cutoff, config.quoting)?;

    Ok(RunSummary { imported, exported })
}

// Exporter for the downgrade file

use crate::cutoff::Cutoff;
use crate::record::{EXPORT_HEADERS, ExportRow};
use crate::store::UserStore;
use csv::QuoteStyle;
use eyre::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// How fields are quoted in the downgrade file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quoting {
    /// Never quote. A field containing a comma, quote or newline corrupts its row.
    #[default]
    Never,
    /// Quote fields that contain a delimiter, quote or newline
    Necessary,
}

impl Quoting {
    fn quote_style(self) -> QuoteStyle {
        match self {
            Quoting::Never => QuoteStyle::Never,
            Quoting::Necessary => QuoteStyle::Necessary,
        }
    }
}

/// Build a CSV writer for the downgrade file. The header is written separately
/// so an empty selection still yields a header row.
pub fn open_export_writer<W: Write>(writer: W, quoting: Quoting) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .quote_style(quoting.quote_style())
        .from_writer(writer)
}

/// Write the users inactive since `cutoff` to `path`, replacing any existing file
///
/// Returns the number of data rows written.
pub fn export_inactive<P: AsRef<Path>>(store: &UserStore, path: P, cutoff: &Cutoff, quoting: Quoting) -> Result<usize> {
    let path = path.as_ref();
    info!(cutoff = %cutoff, "Selecting users with last login before cutoff");

    let users = store.inactive_users(cutoff)?;

    let file = File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = open_export_writer(BufWriter::new(file), quoting);

    writer.write_record(EXPORT_HEADERS)?;

    let count = users.len();
    for user in users {
        writer.serialize(ExportRow::downgrade(user))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file {}", path.display()))?;

    info!(count, path = %path.display(), "Wrote downgrade file");
    Ok(count)
}

// Importer for the platform's user export CSV

use crate::record::UserRecord;
use crate::store::UserStore;
use encoding_rs_io::DecodeReaderBytes;
use eyre::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Open a header-driven CSV reader over `reader`, dropping a leading byte-order mark
pub fn open_export_reader<R: Read>(reader: R) -> csv::Reader<DecodeReaderBytes<R, Vec<u8>>> {
    let decoded = DecodeReaderBytes::new(reader);

    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .double_quote(true)
        .from_reader(decoded)
}

/// Import every user in the export file into the store
///
/// All rows are committed together once the whole file has been read; a
/// missing column or malformed date leaves the store unchanged.
pub fn import_users<P: AsRef<Path>>(store: &mut UserStore, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open export file {}", path.display()))?;

    let mut reader = open_export_reader(BufReader::new(file));
    let users = reader
        .deserialize::<UserRecord>()
        .map(|row| row.with_context(|| format!("Failed to read user from {}", path.display())));

    let count = store.insert_users(users)?;

    info!(count, path = %path.display(), "Imported users");
    Ok(count)
}

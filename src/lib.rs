// staleusers - load a user export into SQLite and list accounts to downgrade

pub mod config;
pub mod cutoff;
pub mod export;
pub mod import;
pub mod pipeline;
pub mod record;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use cutoff::Cutoff;
pub use export::{Quoting, export_inactive};
pub use import::import_users;
pub use pipeline::{RunConfig, RunSummary, run};
pub use record::{ExportRow, InactiveUser, UserRecord};
pub use store::UserStore;

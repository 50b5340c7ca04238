//! Durable storage of the transfers tracked by the relayer.
//!
//! [`TransferStore`] is the only shared mutable resource of the relayer. Every write after the
//! initial insert is a compare-and-swap on the record's state and version, which is how workers
//! agree on who gets to advance a record.

pub mod errors;
pub mod inmemory;
pub mod persistent;
pub mod transfers;

pub use inmemory::TransferStoreInMemory;
pub use persistent::{config::DbConfig, sqlite::SqliteDb};
pub use transfers::{TransferStats, TransferStore};

/// The schema migrations of the SQLite store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

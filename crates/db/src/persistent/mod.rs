//! The SQLite store.

pub mod config;
pub mod constants;
pub mod errors;
mod models;
pub mod retry;
pub mod sqlite;

//! Core of the bookkeeper ledger: the transaction model, its SQLite-backed
//! repository and the analytics computed over it.
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;

pub use analytics::Analytics;
pub use config::Config;
pub use db::Repository;
pub use error::{Error, Result, ValidationError};

//! SQLite storage gateway for the order service.

//!
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;

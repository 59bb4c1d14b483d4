//! Thin MongoDB data-access layer and mongoimport-driven bulk loader.

pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod import;

pub use config::ConnectionParams;
pub use connection::{DocumentCursor, MongoSession};
pub use error::{Error, Result};
pub use import::{ImportSummary, ImportedFile, MongoImporter};

//! Bulk import of JSON files through mongoimport.
//!
//! - `scan`: recursive extension-filtered file discovery and relocation
//! - `tool`: mongoimport path detection
//! - `importer`: per-file invocation and the directory run

pub mod importer;
pub mod scan;
pub mod tool;

pub use importer::{ImportSummary, ImportedFile, MongoImporter};
pub use scan::{collect_file_paths, move_file};
pub use tool::mongoimport_path;

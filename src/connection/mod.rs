//! MongoDB connection handling and document operations.
//!
//! This module provides:
//! - `MongoSession`: the client → database → collection connect sequence
//! - `ops`: CRUD passthroughs on the active collection
//! - `DocumentCursor`: blocking iteration over find results

pub mod cursor;
pub mod ops;
pub mod session;

pub use cursor::DocumentCursor;
pub use session::MongoSession;

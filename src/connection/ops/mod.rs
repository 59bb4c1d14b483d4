//! Database operations split into focused modules.

pub mod documents;

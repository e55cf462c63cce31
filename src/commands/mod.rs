//! Command implementations wired to the CLI.

pub mod ingest;
pub mod query;

pub use ingest::{IngestCommand, IngestReport};
pub use query::QueryCommand;

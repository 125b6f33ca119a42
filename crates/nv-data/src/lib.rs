//! Design parsing, entry reading and data sources for view navigation

pub mod batch;
pub mod config;
pub mod design;
pub mod reader;
pub mod sources;

mod xml;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use batch::window_to_record_batch;
pub use config::{NoteKind, ViewSchemaOptions, ViewTarget};
pub use design::{ColumnSpec, FieldMapping, SchemaBuilder, ViewSchema};
pub use reader::EntryReader;
pub use sources::{load_design, MemorySource, RemoteViewSource, Transport};

/// A design document that could not be turned into a schema.
///
/// Carries the raw response so callers can show what the backend sent, which
/// is usually a login or error page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("design parse error: {reason}")]
pub struct DesignParseError {
    pub reason: String,
    pub raw: String,
}

impl DesignParseError {
    pub fn new(reason: impl Into<String>, raw: &str) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    DesignParse(#[from] DesignParseError),

    #[error("entry parse error: {0}")]
    EntryParse(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

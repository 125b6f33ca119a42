//! Schema and target configuration

pub mod schema_options;
pub mod target;

pub use schema_options::*;
pub use target::*;

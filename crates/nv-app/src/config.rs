//! Application configuration file

use std::path::Path;

use anyhow::{Context, Result};
use nv_core::PaginatorOptions;
use nv_data::ViewSchemaOptions;
use serde::{Deserialize, Serialize};

/// Settings read from the optional `--config` JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub schema: ViewSchemaOptions,
    pub pager: PaginatorOptions,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

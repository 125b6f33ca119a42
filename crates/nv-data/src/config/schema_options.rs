//! Options controlling how a design document becomes a schema

use serde::{Deserialize, Serialize};

/// Schema builder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSchemaOptions {
    /// Restrict the view to a single category.
    ///
    /// The backend only honours the restriction when the first column is the
    /// category column, and that column is then left out of the schema.
    pub single_category: Option<String>,

    /// Sorting happens locally on loaded entries, so every column is sortable
    pub local_sort_only: bool,

    /// `Some(true)` always stretches the last column, `Some(false)` never does,
    /// `None` follows the design document's own flag
    pub force_extend_last_column: Option<bool>,
}

impl ViewSchemaOptions {
    pub fn with_single_category(mut self, category: impl Into<String>) -> Self {
        self.single_category = Some(category.into());
        self
    }

    pub fn with_local_sort(mut self, local_sort_only: bool) -> Self {
        self.local_sort_only = local_sort_only;
        self
    }

    pub fn with_extend_last_column(mut self, extend: Option<bool>) -> Self {
        self.force_extend_last_column = extend;
        self
    }
}

//! The immutable result of parsing a design document

use serde::{Deserialize, Serialize};

use super::ColumnSpec;

/// Maps a record field to the column that fills it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,
    pub column_order: usize,
}

/// Column layout and record shape of a view or folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSchema {
    pub(crate) view_name: Option<String>,
    pub(crate) columns: Vec<ColumnSpec>,
    pub(crate) field_mapping: Vec<FieldMapping>,
    pub(crate) is_categorized: bool,
    pub(crate) is_folder_variant: bool,
    pub(crate) auto_expand_column_order: Option<usize>,
    pub(crate) allows_row_selection: bool,
}

impl ViewSchema {
    pub(crate) fn new(
        view_name: Option<String>,
        columns: Vec<ColumnSpec>,
        is_categorized: bool,
        is_folder_variant: bool,
        auto_expand_column_order: Option<usize>,
        allows_row_selection: bool,
    ) -> Self {
        let field_mapping = Self::mapping_for(&columns);
        Self {
            view_name,
            columns,
            field_mapping,
            is_categorized,
            is_folder_variant,
            auto_expand_column_order,
            allows_row_selection,
        }
    }

    /// Record field mapping for a column list
    pub fn mapping_for(columns: &[ColumnSpec]) -> Vec<FieldMapping> {
        columns
            .iter()
            .map(|c| FieldMapping {
                name: c.name.clone(),
                column_order: c.order,
            })
            .collect()
    }

    /// Name declared on the design note, if any
    pub fn view_name(&self) -> Option<&str> {
        self.view_name.as_deref()
    }

    /// Visible columns in display order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn field_mapping(&self) -> &[FieldMapping] {
        &self.field_mapping
    }

    pub fn is_categorized(&self) -> bool {
        self.is_categorized
    }

    pub fn is_folder_variant(&self) -> bool {
        self.is_folder_variant
    }

    /// Column that stretches to fill remaining width
    pub fn auto_expand_column_order(&self) -> Option<usize> {
        self.auto_expand_column_order
    }

    pub fn allows_row_selection(&self) -> bool {
        self.allows_row_selection
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_by_order(&self, order: usize) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.order == order)
    }

    /// First retained category column
    pub fn category_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.is_category_column)
    }

    /// Field name for a backend column number
    pub fn field_for_column(&self, column_order: usize) -> Option<&str> {
        self.field_mapping
            .iter()
            .find(|m| m.column_order == column_order)
            .map(|m| m.name.as_str())
    }
}

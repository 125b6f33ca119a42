//! Column descriptors derived from a design document

use serde::{Deserialize, Serialize};

/// Pixels per inch of declared column width
pub const PIXELS_PER_INCH: f32 = 11.28;

/// Narrowest column the schema will produce, so zero-width columns stay usable
pub const MIN_COLUMN_WIDTH: f32 = 22.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Accepts names as well as the numeric codes used by design exports
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("center" | "1") => Alignment::Center,
            Some("right" | "2") => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

/// How a column can be resorted by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
    /// Both directions are offered
    Both,
    /// Clicking the header opens another view
    JumpToView(String),
}

impl SortDirection {
    pub fn allows_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending | SortDirection::Both)
    }

    pub fn allows_descending(&self) -> bool {
        matches!(self, SortDirection::Descending | SortDirection::Both)
    }
}

/// Separator used when a column renders multiple values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSeparator {
    #[default]
    None,
    Space,
    Comma,
    Semicolon,
    NewLine,
}

impl ListSeparator {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("space") => ListSeparator::Space,
            Some("comma") => ListSeparator::Comma,
            Some("semicolon") => ListSeparator::Semicolon,
            Some("newline") => ListSeparator::NewLine,
            _ => ListSeparator::None,
        }
    }

    /// Text placed between list values when rendering
    pub fn as_str(&self) -> &'static str {
        match self {
            ListSeparator::None | ListSeparator::Space => " ",
            ListSeparator::Comma => ", ",
            ListSeparator::Semicolon => "; ",
            ListSeparator::NewLine => "\n",
        }
    }
}

/// Date/time display settings of a column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeFormat {
    pub show: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub zone: Option<String>,
}

/// A single visible column of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Record field name, unique within the schema
    pub name: String,
    pub title: String,
    /// Position among the retained columns, starting at 0
    pub order: usize,
    /// Width in pixels
    pub width: f32,
    pub align: Alignment,
    pub header_align: Alignment,
    pub sortable: bool,
    pub sort_direction: SortDirection,
    pub is_category_column: bool,
    pub is_hidden: bool,
    pub shows_as_icon: bool,
    pub allows_response_only: bool,
    pub twisties: bool,
    pub resizable: bool,
    pub list_separator: ListSeparator,
    pub date_time_format: Option<DateTimeFormat>,
}

impl ColumnSpec {
    /// Convert a declared width in inches to pixels, never narrower than the floor
    pub fn width_from_inches(inches: f32) -> f32 {
        (inches * PIXELS_PER_INCH).max(MIN_COLUMN_WIDTH)
    }

    /// Field name for a column without a usable item name
    pub fn synthesized_name(order: usize) -> String {
        format!("columnnumber_{order}")
    }

    /// Replace characters the record layer cannot use in field names
    pub fn normalize_name(name: &str) -> String {
        name.replace('$', "_")
    }

    /// Target view of a jump-to-view column
    pub fn jump_target(&self) -> Option<&str> {
        match &self.sort_direction {
            SortDirection::JumpToView(target) => Some(target),
            _ => None,
        }
    }
}

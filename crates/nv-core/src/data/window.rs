//! Fetched page windows and their entries

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::navigation::PositionKey;

/// A single column value of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Raw backend text plus the parsed instant when it could be read
    DateTime {
        raw: String,
        parsed: Option<DateTime<FixedOffset>>,
    },
    List(Vec<FieldValue>),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(values) => values.iter().all(FieldValue::is_empty),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the value as display text, joining lists with `separator`
    pub fn display_with(&self, separator: &str) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::DateTime { raw, parsed } => match parsed {
                Some(dt) => dt.to_rfc3339(),
                None => raw.clone(),
            },
            FieldValue::List(values) => values
                .iter()
                .map(|v| v.display_with(separator))
                .collect::<Vec<_>>()
                .join(separator),
            FieldValue::Empty => String::new(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_with(", "))
    }
}

/// Backend bookkeeping attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub unid: Option<String>,
    pub note_id: Option<String>,
    pub children: u32,
    pub descendants: u32,
    pub siblings: u32,
    pub is_response: bool,
}

/// One row of a page window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// `None` for category totals and for entries whose key failed to parse
    pub position: Option<PositionKey>,
    pub fields: IndexMap<String, FieldValue>,
    /// Synthetic rollup row summarizing a category
    pub is_category_total: bool,
    pub meta: EntryMeta,
}

impl Entry {
    pub fn new(position: PositionKey) -> Self {
        Self {
            position: Some(position),
            fields: IndexMap::new(),
            is_category_total: false,
            meta: EntryMeta::default(),
        }
    }

    pub fn category_total() -> Self {
        Self {
            position: None,
            fields: IndexMap::new(),
            is_category_total: true,
            meta: EntryMeta::default(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Position usable as a paging boundary
    pub fn boundary(&self) -> Option<&PositionKey> {
        if self.is_category_total {
            None
        } else {
            self.position.as_ref()
        }
    }
}

/// The result of one fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageWindow {
    pub entries: Vec<Entry>,
    pub total_count: usize,
    /// `None` when the originating request omitted a start
    pub requested_start: Option<PositionKey>,
    pub requested_count: usize,
    pub is_categorized: bool,
}

impl PageWindow {
    pub fn empty(requested_start: Option<PositionKey>, requested_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            total_count: 0,
            requested_start,
            requested_count,
            is_categorized: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry position that can serve as a paging boundary
    pub fn first_boundary(&self) -> Option<&PositionKey> {
        self.entries.iter().find_map(Entry::boundary)
    }

    /// Last entry position that can serve as a paging boundary.
    ///
    /// Trailing category totals carry no usable position and are skipped.
    pub fn last_boundary(&self) -> Option<&PositionKey> {
        self.entries.iter().rev().find_map(Entry::boundary)
    }
}

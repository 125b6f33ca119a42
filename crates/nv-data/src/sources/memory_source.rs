//! In-memory view data source

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use nv_core::{Entry, FetchRequest, FieldValue, PageWindow, PositionKey, SortRequest, ViewDataSource};
use tracing::debug;

use crate::design::ViewSchema;
use crate::reader::EntryReader;
use crate::DataError;

/// Serves windows out of a fully loaded entry list.
///
/// Entries are kept in listing order. A window starts at the first entry whose
/// position is at or after the requested start and holds up to `count`
/// entries, category totals included.
pub struct MemorySource {
    name: String,
    schema: Arc<ViewSchema>,
    entries: Vec<Entry>,
    total_count: usize,
}

impl MemorySource {
    /// Create a source over already materialized entries
    pub fn new(name: impl Into<String>, schema: Arc<ViewSchema>, entries: Vec<Entry>, total_count: usize) -> Self {
        Self {
            name: name.into(),
            schema,
            entries,
            total_count,
        }
    }

    /// Load every entry of an entry stream document
    pub fn from_document(name: impl Into<String>, schema: Arc<ViewSchema>, document: &str) -> Result<Self, DataError> {
        let reader = EntryReader::new(schema.clone());
        let (total_count, entries) = reader.read_entries(document)?;
        Ok(Self::new(name, schema, entries, total_count))
    }

    /// Load an entry stream document from disk
    pub async fn from_path<P: AsRef<Path>>(path: P, schema: Arc<ViewSchema>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let document = tokio::fs::read_to_string(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("entries.xml")
            .to_string();
        Self::from_document(name, schema, &document)
    }

    pub fn schema(&self) -> &Arc<ViewSchema> {
        &self.schema
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries in the order a resort would return them.
    ///
    /// Flat listings are sorted by the requested column and renumbered from 1;
    /// categorized listings keep their order.
    fn sorted(&self, sort: &SortRequest) -> Option<Vec<Entry>> {
        if self.schema.is_categorized() {
            debug!(column = sort.column_order, "resort ignored for categorized listing");
            return None;
        }
        let field = self.schema.field_for_column(sort.column_order)?;

        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| {
            let ordering = compare_values(a.field(field), b.field(field));
            if sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.position = Some(PositionKey::from_index(i + 1));
        }
        Some(entries)
    }
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Some(FieldValue::DateTime { parsed: Some(x), .. }), Some(FieldValue::DateTime { parsed: Some(y), .. })) => {
            x.cmp(y)
        }
        (Some(x), Some(y)) => x.to_string().to_lowercase().cmp(&y.to_string().to_lowercase()),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl ViewDataSource for MemorySource {
    async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<PageWindow> {
        let resorted = request.sort.as_ref().and_then(|sort| self.sorted(sort));
        let entries = resorted.as_deref().unwrap_or(&self.entries);

        let start = request.effective_start();
        let offset = entries
            .iter()
            .position(|e| e.position.as_ref().map_or(false, |p| *p >= start))
            .unwrap_or(entries.len());

        let window: Vec<Entry> = entries[offset..].iter().take(request.count).cloned().collect();
        debug!(source = %self.name, %start, offset, entries = window.len(), "served window from memory");

        Ok(PageWindow {
            entries: window,
            total_count: self.total_count,
            requested_start: request.start.clone(),
            requested_count: request.count,
            is_categorized: self.schema.is_categorized(),
        })
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

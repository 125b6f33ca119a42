//! Data source contract used by the paginator

mod window;

pub use window::{Entry, EntryMeta, FieldValue, PageWindow};

use serde::{Deserialize, Serialize};

use crate::navigation::PositionKey;

/// Remote resort of a view by one of its columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    /// Column order as assigned by the view schema
    pub column_order: usize,
    pub descending: bool,
}

/// Parameters for a single page fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Omitted after a resort so the backend starts from the top
    pub start: Option<PositionKey>,
    pub count: usize,
    pub sort: Option<SortRequest>,
}

impl FetchRequest {
    pub fn at(start: PositionKey, count: usize) -> Self {
        Self {
            start: Some(start),
            count,
            sort: None,
        }
    }

    /// The start the backend will actually use
    pub fn effective_start(&self) -> PositionKey {
        self.start.clone().unwrap_or_else(PositionKey::first)
    }
}

/// Trait for view data sources
#[async_trait::async_trait]
pub trait ViewDataSource: Send + Sync {
    /// Fetch up to `request.count` entries starting at `request.start`
    async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<PageWindow>;

    /// Get the source name
    fn source_name(&self) -> &str;
}

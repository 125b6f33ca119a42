use serde::{Deserialize, Serialize};

mod cache;
mod engine;
mod position;
mod state;
mod subscriber;

pub use cache::{CacheHit, PositionCache};
pub use engine::Paginator;
pub use position::{PositionKey, PositionParseError};
pub use state::{DisplayState, NavigationOutcome, PagerAction, PagerSnapshot, PagerStatus};
pub use subscriber::PagingSubscriber;

/// Default number of entries requested per page
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// Text used to build the paging display labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingLabels {
    /// Placed between the first and last position of the range label
    pub range_separator: String,
    /// Placed before the total in the total label
    pub total_prefix: String,
}

impl Default for PagingLabels {
    fn default() -> Self {
        Self {
            range_separator: " - ".to_string(),
            total_prefix: "of ".to_string(),
        }
    }
}

/// Paginator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginatorOptions {
    /// Entries requested per fetch
    pub page_size: usize,
    pub labels: PagingLabels,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            labels: PagingLabels::default(),
        }
    }
}

impl PaginatorOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

//! Paging subscriber trait

use super::PagerSnapshot;

/// Trait for components that need to respond to page changes
pub trait PagingSubscriber: Send + Sync {
    /// Called after a fetched window has been applied
    fn on_page_change(&self, snapshot: &PagerSnapshot);

    /// Called when the latest fetch failed
    fn on_page_error(&self, _message: &str) {}
}

//! Core functionality for hierarchical view navigation
//!
//! This crate provides position keys, the backward-navigation cache and the
//! paginator that drives a [`ViewDataSource`] page by page.

pub mod data;
pub mod navigation;

use thiserror::Error;

// Re-export commonly used types
pub use data::{Entry, EntryMeta, FetchRequest, FieldValue, PageWindow, SortRequest, ViewDataSource};
pub use navigation::{
    DisplayState, NavigationOutcome, PagerAction, PagerSnapshot, PagerStatus, Paginator,
    PaginatorOptions, PagingLabels, PagingSubscriber, PositionCache, PositionKey,
    PositionParseError,
};

/// Errors surfaced by paginator operations
#[derive(Error, Debug)]
pub enum PagerError {
    #[error("fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionParseError),

    #[error("invalid page size {0}")]
    InvalidPageSize(usize),
}

//! Paging state exposed to callers

use serde::{Deserialize, Serialize};

use super::{PagingLabels, PositionKey};
use crate::data::PageWindow;

/// Lifecycle of the paginator's most recent request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagerStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Navigation operation that issued a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagerAction {
    First,
    Previous,
    Next,
    Last,
    Refresh,
    Jump,
    Resort,
}

/// Labels and button enablement derived from the loaded page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub current_range_label: String,
    pub total_label: String,
    pub first_enabled: bool,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

impl DisplayState {
    pub(crate) fn derive(
        window: Option<&PageWindow>,
        current_start: &PositionKey,
        total_count: usize,
        labels: &PagingLabels,
    ) -> Self {
        let (first, last) = match window {
            Some(window) if !window.is_empty() => {
                let first = window
                    .first_boundary()
                    .cloned()
                    .unwrap_or_else(|| current_start.clone());
                let last = window.last_boundary().cloned().unwrap_or_else(|| first.clone());
                (first, last)
            }
            _ => (PositionKey::first(), PositionKey::first()),
        };

        let at_start = current_start.is_first();
        // measured against the count the window was requested with
        let full_page = window.map_or(false, |w| w.len() >= w.requested_count);

        Self {
            current_range_label: format!("{first}{}{last}", labels.range_separator),
            total_label: format!("{}{total_count}", labels.total_prefix),
            first_enabled: !at_start,
            previous_enabled: !at_start,
            next_enabled: full_page,
            last_enabled: full_page,
        }
    }
}

/// Point-in-time view of the paginator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerSnapshot {
    pub status: PagerStatus,
    pub current_start: PositionKey,
    /// Position shown in the page field; reset to `1` after a resort
    pub active_page: PositionKey,
    pub page_size: usize,
    pub total_count: usize,
    pub last_action: Option<PagerAction>,
    pub window: Option<PageWindow>,
    pub display: DisplayState,
}

/// What happened to a navigation request once its fetch completed
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The response was applied
    Applied(PagerSnapshot),
    /// A newer request was issued first; the response was discarded
    Superseded { request: u64 },
}

impl NavigationOutcome {
    pub fn snapshot(&self) -> Option<&PagerSnapshot> {
        match self {
            NavigationOutcome::Applied(snapshot) => Some(snapshot),
            NavigationOutcome::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationOutcome::Superseded { .. })
    }
}

//! Caller-supplied HTTP access

use async_trait::async_trait;

/// Fetches documents from the backend.
///
/// The crate never performs network I/O itself; callers plug in whatever
/// client, authentication and timeout policy they use.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the response body
    async fn get(&self, url: &str) -> anyhow::Result<String>;
}

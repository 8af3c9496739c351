//! Read contract for the live post store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::Post;

/// Why a live store read did not produce rows. Adapters return these without logging;
/// the post repository decides what happens next.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store transport failed: {0}")]
    Transport(String),
    #[error("store rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("store query failed: {0}")]
    Query(String),
    #[error("store returned rows that could not be decoded: {0}")]
    Decode(String),
    #[error("store returned {count} rows for slug `{slug}`")]
    Ambiguous { slug: String, count: usize },
    #[error("store read timed out")]
    Timeout,
}

impl StoreError {
    /// Stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "transport",
            StoreError::Rejected { .. } => "rejected",
            StoreError::Query(_) => "query",
            StoreError::Decode(_) => "decode",
            StoreError::Ambiguous { .. } => "ambiguous",
            StoreError::Timeout => "timeout",
        }
    }
}

/// Read-only access to the hosted post table.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Every post, newest `published_at` first with undated rows last.
    async fn list_all(&self) -> Result<Vec<Post>, StoreError>;

    /// The single post with this exact slug. More than one match is
    /// [`StoreError::Ambiguous`].
    async fn find_one_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;
}

/// Pick the single row of a zero-or-one lookup.
pub fn expect_at_most_one(slug: &str, mut rows: Vec<Post>) -> Result<Option<Post>, StoreError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        count => Err(StoreError::Ambiguous {
            slug: slug.to_string(),
            count,
        }),
    }
}

//! Post reads with a guaranteed answer.
//!
//! [`PostRepository`] asks the live store when one is configured and falls back to
//! the built-in sample collection whenever the store is unconfigured, unreachable,
//! or has nothing to show. Store failures are absorbed here and never reach the
//! caller; each one is logged once and counted.

use std::{sync::Arc, time::Instant};

use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::repos::{PostStore, StoreError};
use crate::application::source::{self, DataSource};
use crate::config::StoreSettings;
use crate::domain::posts::{self, Post};
use crate::domain::slug::{self, SlugError};

pub const METRIC_STORE_READ_TOTAL: &str = "inkpost_store_read_total";
pub const METRIC_STORE_FALLBACK_TOTAL: &str = "inkpost_store_fallback_total";
pub const METRIC_STORE_READ_MS: &str = "inkpost_store_read_ms";

const OP_LIST_POSTS: &str = "list_posts";
const OP_GET_POST_BY_SLUG: &str = "get_post_by_slug";

#[derive(Debug, Error)]
pub enum PostLookupError {
    #[error("malformed slug: {0}")]
    MalformedSlug(#[from] SlugError),
}

/// Result of a full listing read, before the fallback decision.
#[derive(Debug)]
pub enum ReadOutcome {
    Rows(Vec<Post>),
    StoreUnavailable(StoreError),
    StoreEmpty,
}

impl From<Result<Vec<Post>, StoreError>> for ReadOutcome {
    fn from(result: Result<Vec<Post>, StoreError>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => ReadOutcome::StoreEmpty,
            Ok(rows) => ReadOutcome::Rows(rows),
            Err(err) => ReadOutcome::StoreUnavailable(err),
        }
    }
}

/// Result of a slug lookup, before the fallback decision.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(Post),
    Missing,
    StoreUnavailable(StoreError),
}

impl From<Result<Option<Post>, StoreError>> for LookupOutcome {
    fn from(result: Result<Option<Post>, StoreError>) -> Self {
        match result {
            Ok(Some(post)) => LookupOutcome::Found(post),
            Ok(None) => LookupOutcome::Missing,
            Err(err) => LookupOutcome::StoreUnavailable(err),
        }
    }
}

/// What a single diagnostic read of the store observed.
#[derive(Debug)]
pub enum StoreProbe {
    NotConfigured,
    Rows { backend: &'static str, count: usize },
    Empty { backend: &'static str },
    Unavailable { backend: &'static str, error: StoreError },
}

#[derive(Clone)]
pub struct PostRepository {
    settings: Arc<StoreSettings>,
    store: Option<Arc<dyn PostStore>>,
}

impl PostRepository {
    pub fn new(settings: Arc<StoreSettings>, store: Option<Arc<dyn PostStore>>) -> Self {
        Self { settings, store }
    }

    /// A repository that always serves the sample collection.
    pub fn sample_only() -> Self {
        Self::new(Arc::new(StoreSettings::default()), None)
    }

    pub fn data_source(&self) -> DataSource {
        match self.live_store() {
            Some(_) => DataSource::Live,
            None => DataSource::Sample,
        }
    }

    /// Every post, newest first. Never empty while the sample collection is non-empty.
    pub async fn list_posts(&self) -> Vec<Post> {
        let Some(store) = self.live_store() else {
            return posts::sample_posts();
        };

        let started = Instant::now();
        let result = store.list_all().await;
        record_read(OP_LIST_POSTS, started);

        match ReadOutcome::from(result) {
            ReadOutcome::Rows(mut rows) => {
                posts::sort_by_publication(&mut rows);
                debug!(
                    target = "inkpost::posts",
                    backend = store.backend(),
                    count = rows.len(),
                    "listed posts from live store"
                );
                rows
            }
            ReadOutcome::StoreEmpty => {
                debug!(
                    target = "inkpost::posts",
                    backend = store.backend(),
                    "live store has no posts; serving samples"
                );
                record_fallback(OP_LIST_POSTS, "empty");
                posts::sample_posts()
            }
            ReadOutcome::StoreUnavailable(err) => {
                absorb_store_error(OP_LIST_POSTS, store.backend(), &err);
                posts::sample_posts()
            }
        }
    }

    /// The post with this slug from the live store, else from the samples.
    ///
    /// Returns `Ok(None)` when neither source has it. The only error is a slug
    /// that could never name a post.
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, PostLookupError> {
        slug::validate_lookup_slug(slug)?;

        let Some(store) = self.live_store() else {
            return Ok(posts::find_sample(slug));
        };

        let started = Instant::now();
        let result = store.find_one_by_slug(slug).await;
        record_read(OP_GET_POST_BY_SLUG, started);

        let post = match LookupOutcome::from(result) {
            LookupOutcome::Found(post) => Some(post),
            LookupOutcome::Missing => {
                let sample = posts::find_sample(slug);
                if sample.is_some() {
                    record_fallback(OP_GET_POST_BY_SLUG, "missing");
                }
                sample
            }
            LookupOutcome::StoreUnavailable(err) => {
                absorb_store_error(OP_GET_POST_BY_SLUG, store.backend(), &err);
                posts::find_sample(slug)
            }
        };

        Ok(post)
    }

    /// Read the store once without falling back, for operator diagnostics.
    pub async fn probe(&self) -> StoreProbe {
        let Some(store) = self.live_store() else {
            return StoreProbe::NotConfigured;
        };

        let backend = store.backend();
        match ReadOutcome::from(store.list_all().await) {
            ReadOutcome::Rows(rows) => StoreProbe::Rows {
                backend,
                count: rows.len(),
            },
            ReadOutcome::StoreEmpty => StoreProbe::Empty { backend },
            ReadOutcome::StoreUnavailable(error) => StoreProbe::Unavailable { backend, error },
        }
    }

    fn live_store(&self) -> Option<&Arc<dyn PostStore>> {
        match source::select_data_source(&self.settings) {
            DataSource::Live => self.store.as_ref(),
            DataSource::Sample => None,
        }
    }
}

fn absorb_store_error(operation: &'static str, backend: &'static str, err: &StoreError) {
    warn!(
        target = "inkpost::posts",
        operation,
        backend,
        kind = err.kind(),
        error = %err,
        "live store read failed; serving samples"
    );
    record_fallback(operation, err.kind());
}

fn record_read(operation: &'static str, started: Instant) {
    counter!(METRIC_STORE_READ_TOTAL, "operation" => operation).increment(1);
    histogram!(METRIC_STORE_READ_MS, "operation" => operation)
        .record(started.elapsed().as_secs_f64() * 1000.0);
}

fn record_fallback(operation: &'static str, reason: &'static str) {
    counter!(
        METRIC_STORE_FALLBACK_TOTAL,
        "operation" => operation,
        "reason" => reason
    )
    .increment(1);
}

//! Direct Postgres adapter for the live post store.

mod types;
mod util;

pub use util::map_sqlx_error;

use std::{future::Future, str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::application::repos::{PostStore, StoreError, expect_at_most_one};
use crate::config::StoreSettings;
use crate::domain::posts::Post;
use crate::infra::error::InfraError;

use types::{POST_COLUMNS, PostRow};

const BACKEND: &str = "postgres";

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    list_sql: String,
    lookup_sql: String,
    timeout: Duration,
}

impl PostgresStore {
    /// Build a lazily connecting pool. Nothing touches the network until the first read,
    /// so an unreachable database surfaces as a read failure rather than a startup error.
    pub fn connect_lazy(settings: &StoreSettings) -> Result<Self, InfraError> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| InfraError::store(BACKEND, "store.url is not set"))?;

        let mut options = PgConnectOptions::from_str(url)
            .map_err(|err| InfraError::store(BACKEND, format!("invalid connection string: {err}")))?;
        if let Some(key) = settings.key.as_deref() {
            options = options.password(key);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.get())
            .acquire_timeout(settings.timeout)
            .connect_lazy_with(options);

        Ok(Self::from_pool(pool, &settings.table, settings.timeout))
    }

    pub fn from_pool(pool: PgPool, table: &str, timeout: Duration) -> Self {
        Self {
            pool,
            list_sql: format!(
                "SELECT {POST_COLUMNS} FROM {table} ORDER BY published_at DESC NULLS LAST"
            ),
            lookup_sql: format!("SELECT {POST_COLUMNS} FROM {table} WHERE slug = $1 LIMIT 2"),
            timeout,
        }
    }

    pub async fn run_migrations(&self) -> Result<(), InfraError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| InfraError::migration(err.to_string()))
    }

    async fn bounded<T, F>(&self, read: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, read).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

#[async_trait]
impl PostStore for PostgresStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        let rows = self
            .bounded(sqlx::query_as::<_, PostRow>(&self.list_sql).fetch_all(&self.pool))
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_one_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let rows = self
            .bounded(
                sqlx::query_as::<_, PostRow>(&self.lookup_sql)
                    .bind(slug)
                    .fetch_all(&self.pool),
            )
            .await?;
        expect_at_most_one(slug, rows.into_iter().map(Post::from).collect())
    }
}

//! PostgREST adapter for the live post store (the Supabase data API).

use async_trait::async_trait;
use reqwest::{
    Client, Response, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::application::repos::{PostStore, StoreError, expect_at_most_one};
use crate::config::StoreSettings;
use crate::domain::posts::Post;
use crate::infra::error::InfraError;

const BACKEND: &str = "rest";
const SELECT_FIELDS: &str =
    "id,title,slug,excerpt,cover_url,tags,published_at,read_time_minutes";
const LIST_ORDER: &str = "published_at.desc.nullslast";
const MAX_ERROR_BODY_CHARS: usize = 512;

const NAIVE_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
const NAIVE_TIMESTAMP_SPACED: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]");

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    endpoint: Url,
}

impl PostgrestStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, InfraError> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| InfraError::store(BACKEND, "store.url is not set"))?;
        let key = settings
            .key
            .as_deref()
            .ok_or_else(|| InfraError::store(BACKEND, "store.key is not set"))?;

        let endpoint = table_endpoint(url, &settings.table)?;

        let client = Client::builder()
            .user_agent(user_agent())
            .default_headers(auth_headers(key)?)
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::store(BACKEND, format!("failed to build client: {err}")))?;

        Ok(Self { client, endpoint })
    }

    fn list_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", SELECT_FIELDS)
            .append_pair("order", LIST_ORDER);
        url
    }

    fn lookup_url(&self, slug: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", SELECT_FIELDS)
            .append_pair("slug", &format!("eq.{slug}"))
            .append_pair("limit", "2");
        url
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<Post>, StoreError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let rows: Vec<PostRow> = decode(response).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }
}

#[async_trait]
impl PostStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        self.fetch_rows(self.list_url()).await
    }

    async fn find_one_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let rows = self.fetch_rows(self.lookup_url(slug)).await?;
        expect_at_most_one(slug, rows)
    }
}

fn user_agent() -> &'static str {
    concat!("inkpost/", env!("CARGO_PKG_VERSION"))
}

fn table_endpoint(base: &str, table: &str) -> Result<Url, InfraError> {
    let normalized = format!("{}/", base.trim_end_matches('/'));
    let base = Url::parse(&normalized)
        .map_err(|err| InfraError::store(BACKEND, format!("invalid store url `{base}`: {err}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(InfraError::store(
            BACKEND,
            format!("store url `{base}` must use http or https"),
        ));
    }

    base.join(&format!("rest/v1/{table}"))
        .map_err(|err| InfraError::store(BACKEND, format!("invalid table path: {err}")))
}

fn auth_headers(key: &str) -> Result<HeaderMap, InfraError> {
    let invalid = |_| InfraError::store(BACKEND, "store.key contains characters not allowed in headers");

    let mut api_key = HeaderValue::from_str(key).map_err(invalid)?;
    api_key.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("apikey"), api_key);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let text: String = String::from_utf8_lossy(&bytes)
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        return Err(StoreError::Rejected {
            status: status.as_u16(),
            message: text,
        });
    }

    serde_json::from_slice(&bytes).map_err(|err| StoreError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout
    } else if err.is_decode() {
        StoreError::Decode(err.to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct PostRow {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    title: String,
    slug: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    cover_url: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    published_at: Option<OffsetDateTime>,
    #[serde(default)]
    read_time_minutes: Option<i32>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt.unwrap_or_default(),
            cover_url: row.cover_url,
            tags: row.tags,
            published_at: row.published_at,
            read_time_minutes: row.read_time_minutes,
        }
    }
}

/// Ids arrive as strings (uuid, text) or numbers (serial columns).
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .map_err(|err| D::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
}

/// RFC 3339 first; timestamps without an offset are read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| PrimitiveDateTime::parse(raw, NAIVE_TIMESTAMP).map(|value| value.assume_utc()))
        .or_else(|_| {
            PrimitiveDateTime::parse(raw, NAIVE_TIMESTAMP_SPACED).map(|value| value.assume_utc())
        })
}

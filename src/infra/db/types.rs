use time::OffsetDateTime;

use crate::domain::posts::Post;

/// Column list shared by both reads. Casts normalise common column types
/// (uuid or integer ids, timestamp without zone, smallint read times).
pub(crate) const POST_COLUMNS: &str = "id::text AS id, title, slug, \
    COALESCE(excerpt, '') AS excerpt, cover_url, tags::text[] AS tags, \
    published_at::timestamptz AS published_at, \
    read_time_minutes::int4 AS read_time_minutes";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) excerpt: String,
    pub(crate) cover_url: Option<String>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) published_at: Option<OffsetDateTime>,
    pub(crate) read_time_minutes: Option<i32>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            cover_url: row.cover_url,
            tags: row.tags,
            published_at: row.published_at,
            read_time_minutes: row.read_time_minutes,
        }
    }
}

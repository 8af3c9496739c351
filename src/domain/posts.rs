mod data;

use std::cmp::Ordering;

use time::{
    OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description,
};

pub use data::SAMPLE_POSTS;

pub const CARD_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
pub const UNPUBLISHED_LABEL: &str = "Unpublished";

/// A single blog post as read from the live store or the built-in sample collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<OffsetDateTime>,
    pub read_time_minutes: Option<i32>,
}

/// Compile-time description of a sample post.
#[derive(Debug, Clone, Copy)]
pub struct SamplePost {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
    pub excerpt: &'static str,
    pub cover_url: &'static str,
    pub tags: &'static [&'static str],
    pub published_at: OffsetDateTime,
    pub read_time_minutes: i32,
}

impl From<&SamplePost> for Post {
    fn from(sample: &SamplePost) -> Self {
        Self {
            id: sample.id.to_string(),
            title: sample.title.to_string(),
            slug: sample.slug.to_string(),
            excerpt: sample.excerpt.to_string(),
            cover_url: Some(sample.cover_url.to_string()),
            tags: Some(sample.tags.iter().map(|tag| (*tag).to_string()).collect()),
            published_at: Some(sample.published_at),
            read_time_minutes: Some(sample.read_time_minutes),
        }
    }
}

/// The sample collection in its fixed order.
pub fn sample_posts() -> Vec<Post> {
    SAMPLE_POSTS.iter().map(Post::from).collect()
}

/// First sample post whose slug matches exactly.
pub fn find_sample(slug: &str) -> Option<Post> {
    SAMPLE_POSTS
        .iter()
        .find(|sample| sample.slug == slug)
        .map(Post::from)
}

/// Newest first. Posts without a publication date sort after every dated post;
/// equal keys keep their incoming order.
pub fn sort_by_publication(posts: &mut [Post]) {
    posts.sort_by(|left, right| compare_publication(left.published_at, right.published_at));
}

fn compare_publication(left: Option<OffsetDateTime>, right: Option<OffsetDateTime>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Card date in UTC, or `Unpublished` when absent.
pub fn format_publication_date(published_at: Option<OffsetDateTime>) -> String {
    let Some(published_at) = published_at else {
        return UNPUBLISHED_LABEL.to_string();
    };

    let published_at = published_at.to_offset(UtcOffset::UTC);
    published_at
        .format(CARD_DATE_FORMAT)
        .unwrap_or_else(|_| published_at.date().to_string())
}

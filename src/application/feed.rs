//! Listing and detail flows: turn repository answers into page views.

use time::format_description::well_known::Rfc3339;
use thiserror::Error;

use crate::application::posts::{PostLookupError, PostRepository};
use crate::domain::posts::{self, Post};
use crate::presentation::views::{
    ListingView, PostCard, PostDetailView, initial_letter, read_time_label,
};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Lookup(#[from] PostLookupError),
}

#[derive(Clone)]
pub struct FeedService {
    posts: PostRepository,
}

impl FeedService {
    pub fn new(posts: PostRepository) -> Self {
        Self { posts }
    }

    /// Cards for the home page, in repository order.
    pub async fn listing(&self) -> ListingView {
        let posts = self.posts.list_posts().await;
        build_listing(&posts)
    }

    /// `Ok(None)` is the not-found signal; errors carry a message for the error page.
    pub async fn post_detail(&self, slug: &str) -> Result<Option<PostDetailView>, FeedError> {
        let post = self.posts.get_post_by_slug(slug).await?;
        Ok(post.map(build_post_detail))
    }
}

/// An empty slice yields the empty-state listing (`has_results == false`).
pub fn build_listing(posts: &[Post]) -> ListingView {
    let cards: Vec<PostCard> = posts.iter().map(build_post_card).collect();

    ListingView {
        post_count: cards.len(),
        has_results: !cards.is_empty(),
        posts: cards,
    }
}

fn build_post_card(post: &Post) -> PostCard {
    PostCard {
        slug: post.slug.clone(),
        title: post.title.clone(),
        excerpt: post.excerpt.clone(),
        cover_url: post.cover_url.clone(),
        initial: initial_letter(&post.title),
        iso_date: iso_date(post),
        published: posts::format_publication_date(post.published_at),
        read_time: read_time_label(post.read_time_minutes),
        tags: post.tags.clone().unwrap_or_default(),
    }
}

fn build_post_detail(post: Post) -> PostDetailView {
    PostDetailView {
        initial: initial_letter(&post.title),
        iso_date: iso_date(&post),
        published: posts::format_publication_date(post.published_at),
        read_time: read_time_label(post.read_time_minutes),
        tags: post.tags.unwrap_or_default(),
        slug: post.slug,
        title: post.title,
        excerpt: post.excerpt,
        cover_url: post.cover_url,
    }
}

fn iso_date(post: &Post) -> Option<String> {
    post.published_at
        .and_then(|published_at| published_at.format(&Rfc3339).ok())
}

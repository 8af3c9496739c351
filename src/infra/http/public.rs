use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::{
        chrome::ChromeService,
        error::ErrorReport,
        feed::{FeedError, FeedService},
        posts::PostRepository,
        syndication::SyndicationService,
    },
    config::SiteSettings,
    presentation::views::{
        ErrorPageView, IndexTemplate, LayoutChrome, LayoutContext, PageMetaView, PostDetailView,
        PostTemplate, render_error_response, render_not_found_response, render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub chrome: Arc<ChromeService>,
    pub syndication: Arc<SyndicationService>,
}

impl HttpState {
    pub fn new(posts: PostRepository, site: Arc<SiteSettings>) -> Self {
        Self {
            feed: Arc::new(FeedService::new(posts.clone())),
            chrome: Arc::new(ChromeService::new(site.clone())),
            syndication: Arc::new(SyndicationService::new(posts, site)),
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/posts/{slug}", get(post_detail))
        .route("/rss.xml", get(rss_feed))
        .route("/static/site.css", get(crate::infra::assets::serve_stylesheet))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load();
    let content = state.feed.listing().await;
    let view = LayoutContext::new(chrome, content);
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

async fn post_detail(
    State(state): State<HttpState>,
    slug: Result<Path<String>, PathRejection>,
) -> Response {
    let chrome = state.chrome.load();
    let Path(slug) = match slug {
        Ok(slug) => slug,
        Err(rejection) => return path_rejection_to_response(rejection, chrome),
    };

    match state.feed.post_detail(&slug).await {
        Ok(Some(content)) => {
            let canonical = state.chrome.canonical(&format!("/posts/{}", content.slug));
            let meta = post_meta(&chrome, &content, canonical);
            let view = LayoutContext::new(chrome.with_meta(meta), content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => feed_error_to_response(err, chrome),
    }
}

async fn rss_feed(State(state): State<HttpState>) -> Response {
    let body = state.syndication.rss_feed().await;
    xml_response(body, "application/rss+xml")
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.load())
}

fn feed_error_to_response(err: FeedError, chrome: LayoutChrome) -> Response {
    let status = match &err {
        FeedError::Lookup(_) => StatusCode::BAD_REQUEST,
    };
    let content = ErrorPageView::post_load_failed(err.to_string());
    let report = ErrorReport::from_error("infra::http::public::post_detail", status, &err);
    render_error_response(chrome, content, report)
}

/// Slugs whose percent-decoding is not UTF-8 never reach the detail flow.
fn path_rejection_to_response(rejection: PathRejection, chrome: LayoutChrome) -> Response {
    let status = StatusCode::BAD_REQUEST;
    let content = ErrorPageView::post_load_failed(rejection.body_text());
    let report = ErrorReport::from_error("infra::http::public::post_detail", status, &rejection);
    render_error_response(chrome, content, report)
}

fn post_meta(
    chrome: &LayoutChrome,
    content: &PostDetailView,
    canonical: String,
) -> PageMetaView {
    let description = fallback_description(&content.excerpt, &chrome.meta.description);

    chrome
        .meta
        .clone()
        .with_canonical(canonical)
        .with_content(content.title.clone(), description)
}

fn fallback_description(candidate: &str, fallback: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn xml_response(body: String, content_type: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

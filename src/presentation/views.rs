use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Render the error page and attach `report` for the response logger.
pub fn render_error_response(
    chrome: LayoutChrome,
    content: ErrorPageView,
    report: ErrorReport,
) -> Response {
    let status = report.status;
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, status);
    if response.status() == status {
        report.attach(&mut response);
    }
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub meta: PageMetaView,
    pub contact_href: String,
    pub feed_href: String,
}

impl LayoutChrome {
    pub fn with_meta(self, meta: PageMetaView) -> Self {
        Self { meta, ..self }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub meta: PageMetaView,
    pub contact_href: String,
    pub feed_href: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            meta: chrome.meta,
            contact_href: chrome.contact_href,
            feed_href: chrome.feed_href,
            content,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_url: Option<String>,
    pub initial: String,
    pub iso_date: Option<String>,
    pub published: String,
    pub read_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub struct ListingView {
    pub posts: Vec<PostCard>,
    pub post_count: usize,
    pub has_results: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<ListingView>,
}

#[derive(Debug)]
pub struct PostDetailView {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_url: Option<String>,
    pub initial: String,
    pub iso_date: Option<String>,
    pub published: String,
    pub read_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
    pub offer_retry: bool,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to continue exploring.".to_string(),
            primary_action: Some(ErrorAction::home()),
            offer_retry: false,
        }
    }

    /// A failed post load; the reader can retry the same address.
    pub fn post_load_failed(message: impl Into<String>) -> Self {
        Self {
            title: "Failed to load the post.".to_string(),
            message: message.into(),
            primary_action: Some(ErrorAction::go_home()),
            offer_retry: true,
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }

    pub fn go_home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Go home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }

    pub fn with_content(self, title: String, description: String) -> Self {
        Self {
            title,
            description,
            ..self
        }
    }
}

/// Upper-cased first character of a title, `?` when there is none.
pub fn initial_letter(title: &str) -> String {
    match title.chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

/// `N min read`, hidden for absent or negative values.
pub fn read_time_label(minutes: Option<i32>) -> Option<String> {
    minutes
        .filter(|minutes| *minutes >= 0)
        .map(|minutes| format!("{minutes} min read"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_letter_uppercases_first_character() {
        assert_eq!(initial_letter("ship faster"), "S");
        assert_eq!(initial_letter("ßeta"), "SS");
        assert_eq!(initial_letter(""), "?");
    }

    #[test]
    fn read_time_is_hidden_when_absent_or_negative() {
        assert_eq!(read_time_label(Some(6)).as_deref(), Some("6 min read"));
        assert_eq!(read_time_label(Some(0)).as_deref(), Some("0 min read"));
        assert_eq!(read_time_label(Some(-3)), None);
        assert_eq!(read_time_label(None), None);
    }
}

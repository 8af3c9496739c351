//! Embedded static asset serving.

use axum::{
    body::Body,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::application::error::ErrorReport;

static SITE_STYLESHEET: &str = include_str!("../../static/site.css");

const STYLESHEET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Serve the embedded site stylesheet.
pub async fn serve_stylesheet() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/css; charset=utf-8")
        .header(CACHE_CONTROL, STYLESHEET_CACHE_CONTROL)
        .body(Body::from(SITE_STYLESHEET))
        .unwrap_or_else(|err| {
            let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
            ErrorReport::from_error(
                "infra::assets::serve_stylesheet",
                StatusCode::INTERNAL_SERVER_ERROR,
                &err,
            )
            .attach(&mut response);
            response
        })
}

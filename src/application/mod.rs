//! Application services: the fallback-aware post repository and the page flows on top of it.

pub mod chrome;
pub mod error;
pub mod feed;
pub mod posts;
pub mod repos;
pub mod source;
pub mod syndication;

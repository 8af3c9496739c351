//! Inkpost: a server-rendered personal blog that reads posts from a hosted store and
//! falls back to a built-in sample collection whenever that store cannot answer.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;

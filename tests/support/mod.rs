#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use inkpost::{
    application::{
        posts::PostRepository,
        repos::{PostStore, StoreError, expect_at_most_one},
    },
    config::StoreSettings,
    domain::posts::Post,
};
use time::macros::datetime;

/// What the scripted store answers with.
pub enum Script {
    Rows(Vec<Post>),
    Empty,
    Failing,
    TimingOut,
}

pub struct ScriptedStore {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn failure(&self) -> Option<StoreError> {
        match self.script {
            Script::Failing => Some(StoreError::Transport("connection refused".to_string())),
            Script::TimingOut => Some(StoreError::Timeout),
            Script::Rows(_) | Script::Empty => None,
        }
    }
}

#[async_trait]
impl PostStore for ScriptedStore {
    fn backend(&self) -> &'static str {
        "scripted"
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure() {
            return Err(err);
        }
        match &self.script {
            Script::Rows(rows) => Ok(rows.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn find_one_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure() {
            return Err(err);
        }
        let rows = match &self.script {
            Script::Rows(rows) => rows.iter().filter(|post| post.slug == slug).cloned().collect(),
            _ => Vec::new(),
        };
        expect_at_most_one(slug, rows)
    }
}

pub fn configured_settings() -> StoreSettings {
    StoreSettings {
        url: Some("https://project.supabase.co".to_string()),
        key: Some("anon-key".to_string()),
        ..StoreSettings::default()
    }
}

pub fn as_store(store: &Arc<ScriptedStore>) -> Arc<dyn PostStore> {
    store.clone()
}

/// Repository over `store`, configured as if credentials were present.
pub fn repository_with(store: Arc<ScriptedStore>) -> PostRepository {
    PostRepository::new(Arc::new(configured_settings()), Some(as_store(&store)))
}

pub fn live_post(id: &str, slug: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: format!("Notes about {title}."),
        cover_url: None,
        tags: Some(vec!["live".to_string()]),
        published_at: Some(datetime!(2025-01-10 08:30:00 UTC)),
        read_time_minutes: Some(4),
    }
}

pub fn sample_slugs() -> Vec<&'static str> {
    vec![
        "getting-started-with-nextjs-supabase",
        "ship-faster-with-a-design-system",
        "from-idea-to-mvp-lean-delivery",
    ]
}

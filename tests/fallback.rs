mod support;

use std::sync::Arc;

use inkpost::{
    application::{
        posts::{PostLookupError, PostRepository, StoreProbe},
        source::DataSource,
    },
    config::StoreSettings,
    domain::posts::{Post, sample_posts},
};
use time::macros::datetime;

use support::{
    Script, ScriptedStore, as_store, configured_settings, live_post, repository_with, sample_slugs,
};

fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.slug.as_str()).collect()
}

#[tokio::test]
async fn unconfigured_store_lists_the_sample_collection_in_order() {
    let repo = PostRepository::sample_only();

    let posts = repo.list_posts().await;

    assert_eq!(repo.data_source(), DataSource::Sample);
    assert_eq!(posts, sample_posts());
    assert_eq!(slugs(&posts), sample_slugs());
}

#[tokio::test]
async fn unconfigured_store_never_touches_the_adapter() {
    let store = ScriptedStore::new(Script::Rows(vec![live_post("1", "live", "Live")]));
    let repo = PostRepository::new(Arc::new(StoreSettings::default()), Some(as_store(&store)));

    let posts = repo.list_posts().await;
    let found = repo.get_post_by_slug("live").await.expect("valid slug");

    assert_eq!(posts, sample_posts());
    assert!(found.is_none());
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn live_rows_are_returned_newest_first() {
    let mut older = live_post("1", "older", "Older");
    older.published_at = Some(datetime!(2023-06-01 00:00:00 UTC));
    let mut undated = live_post("2", "undated", "Undated");
    undated.published_at = None;
    let newer = live_post("3", "newer", "Newer");
    let store = ScriptedStore::new(Script::Rows(vec![older, undated, newer]));
    let repo = repository_with(store.clone());

    let posts = repo.list_posts().await;

    assert_eq!(repo.data_source(), DataSource::Live);
    assert_eq!(slugs(&posts), vec!["newer", "older", "undated"]);
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn failing_store_falls_back_to_samples() {
    let store = ScriptedStore::new(Script::Failing);
    let repo = repository_with(store.clone());

    let posts = repo.list_posts().await;

    assert_eq!(posts.len(), 3);
    assert_eq!(posts, sample_posts());
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn timed_out_store_falls_back_to_samples() {
    let repo = repository_with(ScriptedStore::new(Script::TimingOut));

    assert_eq!(repo.list_posts().await, sample_posts());
}

#[tokio::test]
async fn empty_store_falls_back_to_samples() {
    let repo = repository_with(ScriptedStore::new(Script::Empty));

    let posts = repo.list_posts().await;

    assert_eq!(posts.len(), 3);
    assert_eq!(posts, sample_posts());
}

#[tokio::test]
async fn every_sample_slug_resolves_without_a_store() {
    let repo = PostRepository::sample_only();

    for slug in sample_slugs() {
        let post = repo
            .get_post_by_slug(slug)
            .await
            .expect("sample slugs are valid")
            .expect("sample slug should resolve");
        assert_eq!(post.slug, slug);
    }
}

#[tokio::test]
async fn getting_started_sample_has_expected_title() {
    let repo = PostRepository::sample_only();

    let post = repo
        .get_post_by_slug("getting-started-with-nextjs-supabase")
        .await
        .expect("valid slug")
        .expect("sample post");

    assert_eq!(post.title, "Getting Started with Next.js & Supabase");
}

#[tokio::test]
async fn unknown_slug_is_absent_everywhere() {
    let repo = PostRepository::sample_only();

    let found = repo
        .get_post_by_slug("does-not-exist-anywhere")
        .await
        .expect("valid slug");

    assert!(found.is_none());
}

#[tokio::test]
async fn live_lookup_prefers_store_rows() {
    let mut shadow = live_post("9", "ship-faster-with-a-design-system", "Store Version");
    shadow.read_time_minutes = Some(12);
    let repo = repository_with(ScriptedStore::new(Script::Rows(vec![shadow.clone()])));

    let found = repo
        .get_post_by_slug("ship-faster-with-a-design-system")
        .await
        .expect("valid slug");

    assert_eq!(found, Some(shadow));
}

#[tokio::test]
async fn sample_slug_missing_from_store_still_resolves() {
    let store = ScriptedStore::new(Script::Rows(vec![live_post("1", "live-only", "Live")]));
    let repo = repository_with(store.clone());

    let found = repo
        .get_post_by_slug("from-idea-to-mvp-lean-delivery")
        .await
        .expect("valid slug")
        .expect("sample should back up the store");

    assert_eq!(found.title, "From Idea to MVP: A Lean Delivery Playbook");
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn failing_lookup_falls_back_to_samples() {
    let repo = repository_with(ScriptedStore::new(Script::Failing));

    let sample = repo
        .get_post_by_slug("getting-started-with-nextjs-supabase")
        .await
        .expect("valid slug");
    let unknown = repo.get_post_by_slug("nowhere").await.expect("valid slug");

    assert!(sample.is_some());
    assert!(unknown.is_none());
}

#[tokio::test]
async fn ambiguous_store_lookup_falls_back_to_samples() {
    let slug = "getting-started-with-nextjs-supabase";
    let repo = repository_with(ScriptedStore::new(Script::Rows(vec![
        live_post("1", slug, "First Copy"),
        live_post("2", slug, "Second Copy"),
    ])));

    let found = repo
        .get_post_by_slug(slug)
        .await
        .expect("valid slug")
        .expect("sample fallback");

    assert_eq!(found.title, "Getting Started with Next.js & Supabase");
}

#[tokio::test]
async fn malformed_slug_is_rejected_before_any_read() {
    let store = ScriptedStore::new(Script::Rows(Vec::new()));
    let repo = repository_with(store.clone());

    let empty = repo.get_post_by_slug("").await;
    let control = repo.get_post_by_slug("bad\nslug").await;
    let long = repo.get_post_by_slug(&"a".repeat(300)).await;

    assert!(matches!(empty, Err(PostLookupError::MalformedSlug(_))));
    assert!(matches!(control, Err(PostLookupError::MalformedSlug(_))));
    assert!(matches!(long, Err(PostLookupError::MalformedSlug(_))));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let repo = repository_with(ScriptedStore::new(Script::Rows(vec![
        live_post("1", "alpha", "Alpha"),
        live_post("2", "beta", "Beta"),
    ])));

    let first = repo.list_posts().await;
    let second = repo.list_posts().await;
    let lookup_first = repo.get_post_by_slug("beta").await.expect("valid slug");
    let lookup_second = repo.get_post_by_slug("beta").await.expect("valid slug");

    assert_eq!(first, second);
    assert_eq!(lookup_first, lookup_second);

    let fallback = repository_with(ScriptedStore::new(Script::Failing));
    assert_eq!(fallback.list_posts().await, fallback.list_posts().await);
}

#[tokio::test]
async fn blank_credentials_count_as_unconfigured() {
    let store = ScriptedStore::new(Script::Failing);
    let settings = StoreSettings {
        key: Some("   ".to_string()),
        ..configured_settings()
    };
    let repo = PostRepository::new(Arc::new(settings), Some(as_store(&store)));

    assert_eq!(repo.data_source(), DataSource::Sample);
    assert_eq!(repo.list_posts().await, sample_posts());
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn probe_reports_without_falling_back() {
    let unconfigured = PostRepository::sample_only().probe().await;
    let rows = repository_with(ScriptedStore::new(Script::Rows(vec![live_post(
        "1", "a", "A",
    )])))
    .probe()
    .await;
    let empty = repository_with(ScriptedStore::new(Script::Empty)).probe().await;
    let failing = repository_with(ScriptedStore::new(Script::Failing))
        .probe()
        .await;

    assert!(matches!(unconfigured, StoreProbe::NotConfigured));
    assert!(matches!(
        rows,
        StoreProbe::Rows {
            backend: "scripted",
            count: 1
        }
    ));
    assert!(matches!(empty, StoreProbe::Empty { .. }));
    match failing {
        StoreProbe::Unavailable { error, .. } => assert_eq!(error.kind(), "transport"),
        other => panic!("expected unavailable probe, got {other:?}"),
    }
}

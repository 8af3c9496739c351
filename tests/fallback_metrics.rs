mod support;

use std::collections::{HashMap, HashSet};

use inkpost::{
    application::posts::{
        METRIC_STORE_FALLBACK_TOTAL, METRIC_STORE_READ_MS, METRIC_STORE_READ_TOTAL,
    },
    infra::telemetry,
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use support::{Script, ScriptedStore, live_post, repository_with};

#[tokio::test]
async fn store_reads_and_fallbacks_emit_labelled_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let failing = repository_with(ScriptedStore::new(Script::Failing));
    failing.list_posts().await;
    failing
        .get_post_by_slug("ship-faster-with-a-design-system")
        .await
        .expect("valid slug");

    let empty = repository_with(ScriptedStore::new(Script::Empty));
    empty.list_posts().await;

    let live = repository_with(ScriptedStore::new(Script::Rows(vec![live_post(
        "1", "live", "Live",
    )])));
    live.list_posts().await;
    live.get_post_by_slug("from-idea-to-mvp-lean-delivery")
        .await
        .expect("valid slug");

    let mut counters: HashMap<(String, Vec<(String, String)>), u64> = HashMap::new();
    let mut histograms: HashSet<String> = HashSet::new();
    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let key = composite_key.key();
        let mut labels: Vec<(String, String)> = key
            .labels()
            .map(|label| (label.key().to_string(), label.value().to_string()))
            .collect();
        labels.sort();
        match value {
            DebugValue::Counter(count) => {
                counters.insert((key.name().to_string(), labels), count);
            }
            DebugValue::Histogram(_) => {
                histograms.insert(key.name().to_string());
            }
            DebugValue::Gauge(_) => {}
        }
    }

    let counter = |name: &str, labels: &[(&str, &str)]| -> u64 {
        let mut labels: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        labels.sort();
        counters
            .get(&(name.to_string(), labels))
            .copied()
            .unwrap_or(0)
    };

    assert_eq!(
        counter(METRIC_STORE_READ_TOTAL, &[("operation", "list_posts")]),
        3
    );
    assert_eq!(
        counter(METRIC_STORE_READ_TOTAL, &[("operation", "get_post_by_slug")]),
        2
    );
    assert_eq!(
        counter(
            METRIC_STORE_FALLBACK_TOTAL,
            &[("operation", "list_posts"), ("reason", "transport")]
        ),
        1
    );
    assert_eq!(
        counter(
            METRIC_STORE_FALLBACK_TOTAL,
            &[("operation", "list_posts"), ("reason", "empty")]
        ),
        1
    );
    assert_eq!(
        counter(
            METRIC_STORE_FALLBACK_TOTAL,
            &[("operation", "get_post_by_slug"), ("reason", "transport")]
        ),
        1
    );
    assert_eq!(
        counter(
            METRIC_STORE_FALLBACK_TOTAL,
            &[("operation", "get_post_by_slug"), ("reason", "missing")]
        ),
        1
    );
    assert!(
        histograms.contains(METRIC_STORE_READ_MS),
        "missing metric: {METRIC_STORE_READ_MS}"
    );
}

//! Digest engine tests: dedup, ordering, send-failure isolation.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use pipeline::testing::{subscriber_with_history, MockMailer};
use pipeline::{DigestEngine, JobDraft, JobStore, MemoryStore, StructuredJob, Subscriber};

/// Jobs "a".."f" with "f" the most recently extracted.
async fn seed_jobs(store: &MemoryStore, keys: &[&str]) {
    let base = Utc::now() - Duration::hours(keys.len() as i64);
    for (i, key) in keys.iter().enumerate() {
        let mut job: StructuredJob = JobDraft {
            title: Some(format!("Job {key}")),
            ..Default::default()
        }
        .into_job(format!("https://fb.com/p/{key}"), "v2-ai");
        job.extracted_at = base + Duration::hours(i as i64);
        store.upsert(&job).await.unwrap();
    }
}

fn id(key: &str) -> String {
    format!("https://fb.com/p/{key}")
}

#[tokio::test]
async fn takes_the_k_most_recent_unseen_jobs() {
    let store = Arc::new(MemoryStore::new());
    seed_jobs(&store, &["a", "b", "c", "d", "e", "f"]).await;
    store.add_subscriber(subscriber_with_history(
        "sub@example.com",
        [id("a"), id("b")],
        None,
    ));

    let mailer = Arc::new(MockMailer::new());
    let sent = mailer.sent_handle();
    let engine = DigestEngine::new(store.clone(), store.clone(), mailer);

    let report = engine.run(4).await.unwrap();
    assert_eq!(report.digests_sent, 1);
    assert_eq!(report.jobs_sent, 4);

    let sends = sent.lock().unwrap();
    let (email, ids) = &sends[0];
    assert_eq!(email, "sub@example.com");
    // The four most recent of the unseen pool, newest first.
    assert_eq!(ids, &vec![id("f"), id("e"), id("d"), id("c")]);

    let sub = store.subscriber("sub@example.com").unwrap();
    assert_eq!(sub.sent_job_ids.len(), 6);
    assert!(sub.sent_job_ids.starts_with(&[id("a"), id("b")]));
    assert!(sub.last_sent_at.is_some());
}

#[tokio::test]
async fn subscriber_with_nothing_unseen_is_skipped_untouched() {
    let store = Arc::new(MemoryStore::new());
    seed_jobs(&store, &["a", "b"]).await;
    store.add_subscriber(subscriber_with_history(
        "seen-it-all@example.com",
        [id("a"), id("b")],
        None,
    ));

    let mailer = Arc::new(MockMailer::new());
    let sent = mailer.sent_handle();
    let engine = DigestEngine::new(store.clone(), store.clone(), mailer);

    let report = engine.run(4).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.digests_sent, 0);
    assert!(sent.lock().unwrap().is_empty());

    let sub = store.subscriber("seen-it-all@example.com").unwrap();
    assert_eq!(sub.sent_job_ids.len(), 2);
    assert!(sub.last_sent_at.is_none());
}

#[tokio::test]
async fn failed_send_leaves_state_untouched_and_isolates_subscriber() {
    let store = Arc::new(MemoryStore::new());
    seed_jobs(&store, &["a", "b", "c"]).await;
    store.add_subscriber(Subscriber::new("broken@example.com"));
    store.add_subscriber(Subscriber::new("fine@example.com"));

    let mailer = Arc::new(MockMailer::new().failing_for("broken@example.com"));
    let sent = mailer.sent_handle();
    let engine = DigestEngine::new(store.clone(), store.clone(), mailer);

    let report = engine.run(10).await.unwrap();
    assert_eq!(report.subscribers_processed, 2);
    assert_eq!(report.failures, 1);
    assert_eq!(report.digests_sent, 1);

    // The failed subscriber must not look like they received anything.
    let broken = store.subscriber("broken@example.com").unwrap();
    assert!(broken.sent_job_ids.is_empty());
    assert!(broken.last_sent_at.is_none());

    let fine = store.subscriber("fine@example.com").unwrap();
    assert_eq!(fine.sent_job_ids.len(), 3);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn no_job_is_ever_sent_twice_across_passes() {
    let store = Arc::new(MemoryStore::new());
    seed_jobs(&store, &["a", "b", "c", "d", "e"]).await;
    store.add_subscriber(Subscriber::new("sub@example.com"));

    let mailer = Arc::new(MockMailer::new());
    let sent = mailer.sent_handle();
    let engine = DigestEngine::new(store.clone(), store.clone(), mailer);

    engine.run(2).await.unwrap();
    seed_jobs(&store, &["f"]).await;
    engine.run(2).await.unwrap();
    engine.run(2).await.unwrap();
    // A fourth pass with nothing new left.
    let report = engine.run(2).await.unwrap();
    assert_eq!(report.digests_sent + report.skipped, 1);

    let sends = sent.lock().unwrap();
    let mut all_sent: Vec<String> = sends.iter().flat_map(|(_, ids)| ids.clone()).collect();
    let unique: HashSet<String> = all_sent.iter().cloned().collect();
    assert_eq!(unique.len(), all_sent.len(), "a job identity was resent");

    // Subscriber history holds no duplicates either.
    let sub = store.subscriber("sub@example.com").unwrap();
    all_sent.sort();
    let mut history = sub.sent_job_ids.clone();
    history.sort();
    assert_eq!(history, all_sent);
}

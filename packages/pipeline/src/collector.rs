//! Result collection and per-source partitioning.

use tracing::warn;

use crate::traits::engine::ScrapeEngine;
use crate::types::post::RawPost;

/// Posts grouped under one requested source URL.
#[derive(Debug, Clone)]
pub struct SourceBucket {
    pub source_url: String,
    pub posts: Vec<RawPost>,
}

/// Fetch whatever the run has produced up to this moment.
///
/// Valid after success, failure, timeout, and abort alike. A fetch failure
/// is not fatal to the invocation: it yields an empty result set and the
/// run summary reports zero items.
pub async fn collect(engine: &dyn ScrapeEngine, run_id: &str) -> Vec<RawPost> {
    match engine.fetch_results(run_id).await {
        Ok(posts) => posts,
        Err(e) => {
            warn!(run_id, error = %e, "Result fetch failed, treating as empty");
            Vec::new()
        }
    }
}

/// Partition posts by exact equality between each post's declared source
/// and the requested source set.
///
/// Matching is exact, not fuzzy. Every post lands in zero or one bucket;
/// posts with no matching (or no declared) source are excluded from
/// per-source counts but still count toward the run total.
pub fn partition_by_source(posts: &[RawPost], requested: &[String]) -> Vec<SourceBucket> {
    let mut buckets: Vec<SourceBucket> = requested
        .iter()
        .map(|source_url| SourceBucket {
            source_url: source_url.clone(),
            posts: Vec::new(),
        })
        .collect();

    for post in posts {
        let Some(declared) = post.source_url.as_deref() else {
            continue;
        };
        if let Some(bucket) = buckets.iter_mut().find(|b| b.source_url == declared) {
            bucket.posts.push(post.clone());
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(source: Option<&str>) -> RawPost {
        let mut p = RawPost::new("content");
        p.source_url = source.map(str::to_string);
        p
    }

    #[test]
    fn partition_is_exact_and_exhaustive() {
        let sources = vec!["https://a".to_string(), "https://b".to_string()];
        let posts = vec![
            post(Some("https://a")),
            post(Some("https://a")),
            post(Some("https://b")),
            post(Some("https://a/")), // trailing slash: no fuzzy matching
            post(Some("https://c")),
            post(None),
        ];

        let buckets = partition_by_source(&posts, &sources);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].posts.len(), 2);
        assert_eq!(buckets[1].posts.len(), 1);

        let bucketed: usize = buckets.iter().map(|b| b.posts.len()).sum();
        assert!(bucketed <= posts.len());
    }

    #[test]
    fn unknown_sources_get_empty_buckets() {
        let sources = vec!["https://a".to_string()];
        let buckets = partition_by_source(&[], &sources);
        assert_eq!(buckets.len(), 1);
        assert!(buckets[0].posts.is_empty());
    }
}

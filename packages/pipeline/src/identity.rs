//! Stable identity resolution for job records.
//!
//! A record's identity is the key everything downstream depends on: the
//! raw-item ledger, job upserts, and digest dedup. Resolution runs an
//! ordered list of strategies, first success wins:
//!
//! 1. the record's own URL
//! 2. its first attachment URL
//! 3. the source/group URL
//! 4. a generated surrogate, only on call paths that permit it
//!
//! Surrogates carry the `generated::` prefix so they can never be mistaken
//! for natural URLs. Natural resolution is deterministic; surrogates embed
//! a content hash, a millisecond timestamp, and a random suffix so distinct
//! inputs never collide.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::IdentityError;
use crate::types::job::JobDraft;
use crate::types::post::RawPost;

/// Prefix tagging generated surrogate identities.
pub const GENERATED_PREFIX: &str = "generated::";

/// How many content characters feed the surrogate hash.
const HASH_SAMPLE_CHARS: usize = 100;

/// How many content characters go into the rejection log sample.
const LOG_SAMPLE_CHARS: usize = 80;

/// Whether a call path may mint surrogate identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Only natural URLs; unresolvable records are rejected.
    NaturalOnly,
    /// Fall through to a generated surrogate when no natural URL exists.
    AllowGenerated,
}

/// The identity-relevant fields of a raw or structured record.
#[derive(Debug, Clone, Default)]
pub struct IdentityFields<'a> {
    pub url: Option<&'a str>,
    pub first_attachment_url: Option<&'a str>,
    pub source_url: Option<&'a str>,
    pub author: Option<&'a str>,
    pub content: &'a str,
}

impl<'a> From<&'a RawPost> for IdentityFields<'a> {
    fn from(post: &'a RawPost) -> Self {
        Self {
            url: post.url.as_deref(),
            first_attachment_url: post.attachments.first().map(|a| a.url.as_str()),
            source_url: post.source_url.as_deref(),
            author: post.author.as_deref(),
            content: &post.content,
        }
    }
}

impl<'a> From<&'a JobDraft> for IdentityFields<'a> {
    fn from(draft: &'a JobDraft) -> Self {
        Self {
            url: draft.post_url.as_deref(),
            first_attachment_url: draft.attachment_urls.first().map(|s| s.as_str()),
            source_url: draft.source_url.as_deref(),
            author: draft.author.as_deref(),
            content: draft.content.as_deref().unwrap_or(""),
        }
    }
}

type Strategy = fn(&IdentityFields) -> Option<String>;

/// Natural strategies in priority order.
const STRATEGIES: &[Strategy] = &[explicit_url, first_attachment, source_url];

/// Resolve one stable identity for a record.
///
/// Deterministic for any record with a natural URL. With
/// `IdentityPolicy::NaturalOnly` and no natural URL, returns
/// `IdentityError::Unresolvable` carrying a content sample for the caller
/// to log; the record must be dropped, not persisted under a placeholder.
pub fn resolve(fields: &IdentityFields, policy: IdentityPolicy) -> Result<String, IdentityError> {
    for strategy in STRATEGIES {
        if let Some(id) = strategy(fields) {
            return Ok(id);
        }
    }

    match policy {
        IdentityPolicy::AllowGenerated => Ok(generate(fields)),
        IdentityPolicy::NaturalOnly => Err(IdentityError::Unresolvable {
            sample: sample(fields.content, LOG_SAMPLE_CHARS),
        }),
    }
}

fn explicit_url(fields: &IdentityFields) -> Option<String> {
    non_empty(fields.url)
}

fn first_attachment(fields: &IdentityFields) -> Option<String> {
    non_empty(fields.first_attachment_url)
}

fn source_url(fields: &IdentityFields) -> Option<String> {
    non_empty(fields.source_url)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build a surrogate identity: author, stripped content hash, timestamp,
/// random suffix, under the distinguishing prefix.
fn generate(fields: &IdentityFields) -> String {
    let author = fields
        .author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("anon");

    let stripped: String = fields
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(HASH_SAMPLE_CHARS)
        .collect();
    let mut hasher = Sha256::new();
    hasher.update(stripped.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!(
        "{}{}::{}::{}::{}",
        GENERATED_PREFIX,
        author,
        &digest[..12],
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

fn sample(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fields<'a>(
        url: Option<&'a str>,
        attachment: Option<&'a str>,
        source: Option<&'a str>,
        content: &'a str,
    ) -> IdentityFields<'a> {
        IdentityFields {
            url,
            first_attachment_url: attachment,
            source_url: source,
            author: Some("tester"),
            content,
        }
    }

    #[test]
    fn explicit_url_wins() {
        let f = fields(
            Some("https://example.com/p/1"),
            Some("https://cdn.example.com/a.jpg"),
            Some("https://example.com/groups/9"),
            "text",
        );
        assert_eq!(
            resolve(&f, IdentityPolicy::NaturalOnly).unwrap(),
            "https://example.com/p/1"
        );
    }

    #[test]
    fn cascade_order() {
        let f = fields(None, Some("https://cdn.example.com/a.jpg"), Some("https://g"), "t");
        assert_eq!(
            resolve(&f, IdentityPolicy::NaturalOnly).unwrap(),
            "https://cdn.example.com/a.jpg"
        );

        let f = fields(Some("   "), None, Some("https://example.com/groups/9"), "t");
        assert_eq!(
            resolve(&f, IdentityPolicy::NaturalOnly).unwrap(),
            "https://example.com/groups/9"
        );
    }

    #[test]
    fn natural_resolution_is_deterministic() {
        let f = fields(Some("https://example.com/p/1"), None, None, "text");
        let a = resolve(&f, IdentityPolicy::AllowGenerated).unwrap();
        let b = resolve(&f, IdentityPolicy::AllowGenerated).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn natural_only_rejects_with_sample() {
        let f = fields(None, None, None, "some orphan content");
        let err = resolve(&f, IdentityPolicy::NaturalOnly).unwrap_err();
        let IdentityError::Unresolvable { sample } = err;
        assert!(sample.contains("orphan"));
    }

    #[test]
    fn surrogates_are_tagged_and_never_natural_looking() {
        let f = fields(None, None, None, "content");
        let id = resolve(&f, IdentityPolicy::AllowGenerated).unwrap();
        assert!(id.starts_with(GENERATED_PREFIX));
        assert!(!id.starts_with("http"));
    }

    #[test]
    fn surrogates_do_not_collide_across_distinct_inputs() {
        let mut seen = HashSet::new();
        for i in 0..10_000 {
            let author = format!("author-{}", i % 37);
            let content = format!("job posting body number {i}");
            let f = IdentityFields {
                url: None,
                first_attachment_url: None,
                source_url: None,
                author: Some(&author),
                content: &content,
            };
            let id = resolve(&f, IdentityPolicy::AllowGenerated).unwrap();
            assert!(seen.insert(id), "collision at sample {i}");
        }
    }
}

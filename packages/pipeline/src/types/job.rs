//! Structured job types.
//!
//! `JobDraft` is the loosely-typed candidate shape both extraction paths
//! produce: the AI-response parser normalizes the service payload into it,
//! and the local fallback extractor builds it directly from raw posts. It
//! converges into a persisted `StructuredJob` only after identity
//! resolution has produced a non-empty unique key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for fields the extractors could not determine.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Placeholder title when no better title can be derived.
pub const FALLBACK_TITLE: &str = "Job Opportunity";

/// A persisted job posting, upserted by `post_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredJob {
    /// Unique key. Either a natural URL or a tagged generated surrogate;
    /// never empty.
    pub post_url: String,

    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub deadline: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,

    /// The group/feed the posting came from.
    pub source: String,

    pub extracted_at: DateTime<Utc>,

    /// Which extraction pass produced this record.
    pub processing_version: String,
}

/// A loosely-typed job candidate before identity resolution.
///
/// Every field the upstream may or may not supply is optional here; the
/// conversion to `StructuredJob` applies the placeholder policy so that
/// nothing downstream branches on missing-vs-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub post_url: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub deadline: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub attachment_urls: Vec<String>,
    pub author: Option<String>,
    /// Original post text, carried for identity generation and logging.
    pub content: Option<String>,
}

impl JobDraft {
    /// Finalize the draft into a persistable job under a resolved identity.
    pub fn into_job(self, identity: String, processing_version: &str) -> StructuredJob {
        let source = self
            .source_url
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.post_url.clone())
            .unwrap_or_else(|| "unknown".to_string());

        StructuredJob {
            post_url: identity,
            title: non_empty_or(self.title, FALLBACK_TITLE),
            company: non_empty_or(self.company, NOT_SPECIFIED),
            location: non_empty_or(self.location, NOT_SPECIFIED),
            salary: self.salary.filter(|s| !s.trim().is_empty()),
            deadline: self.deadline.filter(|s| !s.trim().is_empty()),
            requirements: self.requirements,
            source,
            extracted_at: Utc::now(),
            processing_version: processing_version.to_string(),
        }
    }
}

fn non_empty_or(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_finalization_applies_placeholders() {
        let draft = JobDraft {
            title: Some("  ".into()),
            company: None,
            location: Some("Remote".into()),
            salary: Some("".into()),
            ..Default::default()
        };

        let job = draft.into_job("https://example.com/p/1".into(), "v2");
        assert_eq!(job.title, FALLBACK_TITLE);
        assert_eq!(job.company, NOT_SPECIFIED);
        assert_eq!(job.location, "Remote");
        assert_eq!(job.salary, None);
        assert_eq!(job.source, "https://example.com/p/1");
        assert_eq!(job.processing_version, "v2");
    }
}

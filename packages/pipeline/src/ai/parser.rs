//! AI response parsing.
//!
//! The structuring service's `data` payload is loosely typed: sometimes a
//! bare array of job objects, sometimes `{"jobs": [...]}`, occasionally a
//! single object, with any individual field missing. All of that is
//! normalized here, once, into [`JobDraft`] records; nothing downstream
//! touches the raw JSON again.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::types::job::JobDraft;

/// One job record as the service emits it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiJobRecord {
    #[serde(default, alias = "url")]
    post_url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default, alias = "groupUrl")]
    source_url: Option<String>,
    #[serde(default)]
    attachments: Vec<Value>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default, alias = "text")]
    content: Option<String>,
}

impl From<AiJobRecord> for JobDraft {
    fn from(record: AiJobRecord) -> Self {
        let attachment_urls = record
            .attachments
            .iter()
            .filter_map(|a| {
                a.as_str()
                    .map(str::to_string)
                    .or_else(|| a.get("url").and_then(Value::as_str).map(str::to_string))
            })
            .collect();

        JobDraft {
            post_url: record.post_url,
            title: record.title,
            company: record.company,
            location: record.location,
            salary: record.salary,
            deadline: record.deadline,
            requirements: record.requirements,
            source_url: record.source_url,
            attachment_urls,
            author: record.author,
            content: record.content,
        }
    }
}

/// Normalize a service payload into zero or more drafts.
///
/// Zero drafts out of a successful response is a valid outcome, distinct
/// from service failure; the caller must not treat it as a fallback
/// trigger. Items that cannot be read as job objects are skipped with a
/// warning, never a panic.
pub fn parse_structured_jobs(data: Option<&Value>) -> Vec<JobDraft> {
    let Some(data) = data else {
        return Vec::new();
    };

    let items: Vec<Value> = if let Some(arr) = data.as_array() {
        arr.clone()
    } else if let Some(arr) = data.get("jobs").and_then(Value::as_array) {
        arr.clone()
    } else if data.is_object() {
        vec![data.clone()]
    } else {
        warn!(kind = data_kind(data), "Unrecognized structuring payload shape");
        return Vec::new();
    };

    let mut drafts = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for item in items {
        match serde_json::from_value::<AiJobRecord>(item) {
            Ok(record) => drafts.push(JobDraft::from(record)),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "Skipping unreadable job record");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, parsed = drafts.len(), "Some job records were unreadable");
    }
    drafts
}

fn data_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

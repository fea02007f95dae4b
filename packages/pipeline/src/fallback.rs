//! Local fallback extractor.
//!
//! Deterministic, heuristic text-to-fields extraction used when the
//! external structuring service reports failure. Ordered per-field rules:
//!
//! - title: an explicit `Job Title:`/`Position:` label, else the first line
//!   matching the role-keyword pattern, else the first non-empty line, in
//!   all cases with markup and decorative symbols stripped
//! - company: first `Company:` label
//! - location: first `Location:` label, plain or symbol-prefixed
//! - deadline: only from an explicit upstream field, never inferred from
//!   text (raw posts carry none, so fallback drafts leave it unset)
//!
//! Posts that do not look like job postings at all produce no draft.
//! Missing fields degrade to explicit placeholders when the draft is
//! finalized, so downstream logic never branches on missing-vs-empty.

use regex::Regex;

use crate::types::job::JobDraft;
use crate::types::post::RawPost;

/// Heuristic extractor over raw post text.
pub struct FallbackExtractor {
    title_label: Regex,
    company_label: Regex,
    location_label: Regex,
    role_keywords: Regex,
    job_markers: Regex,
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackExtractor {
    pub fn new() -> Self {
        Self {
            title_label: Regex::new(r"(?im)^[^\w\n]*(?:job\s*title|position)\s*:\s*(.+)$").unwrap(),
            company_label: Regex::new(r"(?im)^[^\w\n]*company\s*:\s*(.+)$").unwrap(),
            location_label: Regex::new(r"(?im)^[^\w\n]*location\s*:\s*(.+)$").unwrap(),
            role_keywords: Regex::new(
                r"(?i)\b(developer|engineer|programmer|manager|analyst|designer|accountant|architect|consultant|technician|administrator|assistant|coordinator|specialist|nurse|teacher|driver|intern|sales|marketing)\b",
            )
            .unwrap(),
            job_markers: Regex::new(
                r"(?i)(hiring|vacancy|vacancies|job\s+opening|apply\s+now|we\s+are\s+looking\s+for|join\s+our\s+team)",
            )
            .unwrap(),
        }
    }

    /// Extract drafts from a batch of posts. Posts that do not read as job
    /// postings are skipped, not padded with placeholder records.
    pub fn extract_jobs(&self, posts: &[RawPost]) -> Vec<JobDraft> {
        posts.iter().filter_map(|p| self.extract_post(p)).collect()
    }

    /// Extract a single draft, or `None` when the text has no job markers.
    pub fn extract_post(&self, post: &RawPost) -> Option<JobDraft> {
        if !self.looks_like_job(&post.content) {
            return None;
        }

        Some(JobDraft {
            post_url: post.url.clone(),
            title: self.title(&post.content),
            company: self.company(&post.content),
            location: self.location(&post.content),
            salary: None,
            deadline: None,
            requirements: Vec::new(),
            source_url: post.source_url.clone(),
            attachment_urls: post.attachments.iter().map(|a| a.url.clone()).collect(),
            author: post.author.clone(),
            content: Some(post.content.clone()),
        })
    }

    fn looks_like_job(&self, text: &str) -> bool {
        self.title_label.is_match(text)
            || self.role_keywords.is_match(text)
            || self.job_markers.is_match(text)
    }

    fn title(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.title_label.captures(text) {
            return non_empty(strip_decoration(&caps[1]));
        }

        if let Some(line) = text
            .lines()
            .find(|line| self.role_keywords.is_match(line))
        {
            if let Some(title) = non_empty(strip_decoration(line)) {
                return Some(title);
            }
        }

        text.lines()
            .map(strip_decoration)
            .find_map(non_empty)
    }

    fn company(&self, text: &str) -> Option<String> {
        self.company_label
            .captures(text)
            .and_then(|caps| non_empty(strip_decoration(&caps[1])))
    }

    fn location(&self, text: &str) -> Option<String> {
        self.location_label
            .captures(text)
            .and_then(|caps| non_empty(strip_decoration(&caps[1])))
    }
}

/// Remove markdown markup anywhere and decorative symbols at the edges.
fn strip_decoration(line: &str) -> String {
    let no_markup: String = line
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`' | '~'))
        .collect();

    no_markup
        .trim_matches(|c: char| {
            c.is_whitespace()
                || matches!(c, '-' | '=' | ':' | '|' | '>' | '•' | '!')
                || (!c.is_ascii() && !c.is_alphanumeric())
        })
        .to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::NOT_SPECIFIED;

    fn extractor() -> FallbackExtractor {
        FallbackExtractor::new()
    }

    #[test]
    fn explicit_title_label_wins() {
        let post = RawPost::new("**Job Title:** Senior Rust Developer\nCompany: Acme\nblah");
        let draft = extractor().extract_post(&post).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Senior Rust Developer"));
        assert_eq!(draft.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn position_label_is_equivalent() {
        let post = RawPost::new("Position: Data Analyst\nsome body text");
        let draft = extractor().extract_post(&post).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Data Analyst"));
    }

    #[test]
    fn role_keyword_line_beats_first_line() {
        let post = RawPost::new("Great news everyone!\nWe need a backend engineer asap\nDM me");
        let draft = extractor().extract_post(&post).unwrap();
        assert_eq!(
            draft.title.as_deref(),
            Some("We need a backend engineer asap")
        );
    }

    #[test]
    fn first_non_empty_line_as_last_resort() {
        let post = RawPost::new("\n\n📢 Now hiring!!!\ncall 555-0100");
        let draft = extractor().extract_post(&post).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Now hiring"));
    }

    #[test]
    fn symbol_prefixed_location_label() {
        let post = RawPost::new("Position: Nurse\n📍 Location: Oslo, Norway\nCompany: Clinic AS");
        let draft = extractor().extract_post(&post).unwrap();
        assert_eq!(draft.location.as_deref(), Some("Oslo, Norway"));
    }

    #[test]
    fn deadline_is_never_inferred() {
        let post = RawPost::new("Position: Chef\nDeadline: tomorrow\nApply by Friday!");
        let draft = extractor().extract_post(&post).unwrap();
        assert_eq!(draft.deadline, None);
    }

    #[test]
    fn non_job_posts_produce_no_draft() {
        let posts = vec![
            RawPost::new("Happy birthday Maria! 🎂"),
            RawPost::new("Position: Welder\nCompany: Steelworks"),
            RawPost::new("Anyone selling a used bike?"),
            RawPost::new("We are looking for a part-time accountant"),
            RawPost::new("Lost cat near the park, please share"),
        ];
        let drafts = extractor().extract_jobs(&posts);
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn missing_fields_degrade_to_placeholders_at_finalization() {
        let post = RawPost::new("hiring").with_url("https://example.com/p/1");
        let draft = extractor().extract_post(&post).unwrap();
        let job = draft.into_job("https://example.com/p/1".into(), "v2-fallback");
        assert_eq!(job.title, "hiring");
        assert_eq!(job.company, NOT_SPECIFIED);
        assert_eq!(job.location, NOT_SPECIFIED);
    }
}

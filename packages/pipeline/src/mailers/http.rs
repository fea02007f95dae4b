//! Digest delivery over a transactional-mail HTTP API.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::MailError;
use crate::traits::mailer::DigestMailer;
use crate::types::job::StructuredJob;

/// Sends digests through a transactional-mail HTTP API.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl DigestMailer for HttpMailer {
    async fn send_digest(&self, email: &str, jobs: &[StructuredJob]) -> Result<(), MailError> {
        let body = json!({
            "from": self.from,
            "to": email,
            "subject": digest_subject(jobs.len()),
            "html": render_digest(jobs),
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Transport(Box::new(e)))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(email, jobs = jobs.len(), "Digest delivered");
        Ok(())
    }
}

fn digest_subject(count: usize) -> String {
    if count == 1 {
        "1 new job opportunity".to_string()
    } else {
        format!("{count} new job opportunities")
    }
}

/// Render the digest body as a plain HTML list.
pub fn render_digest(jobs: &[StructuredJob]) -> String {
    let mut html = String::from("<h2>New job opportunities</h2>\n<ul>\n");
    for job in jobs {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a> - {} ({})</li>\n",
            job.post_url, job.title, job.company, job.location
        ));
    }
    html.push_str("</ul>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::JobDraft;

    #[test]
    fn digest_rendering_lists_every_job() {
        let jobs: Vec<StructuredJob> = (0..3)
            .map(|i| {
                JobDraft {
                    title: Some(format!("Job {i}")),
                    company: Some("Acme".into()),
                    ..Default::default()
                }
                .into_job(format!("https://example.com/p/{i}"), "v2")
            })
            .collect();

        let html = render_digest(&jobs);
        assert_eq!(html.matches("<li>").count(), 3);
        assert!(html.contains("https://example.com/p/2"));

        assert_eq!(digest_subject(1), "1 new job opportunity");
        assert_eq!(digest_subject(4), "4 new job opportunities");
    }
}

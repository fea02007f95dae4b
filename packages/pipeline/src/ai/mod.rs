//! External structuring service glue: request rendering, response parsing,
//! and the HTTP client implementation of [`JobStructurer`].
//!
//! [`JobStructurer`]: crate::traits::structurer::JobStructurer

pub mod http;
pub mod parser;

pub use http::HttpStructurer;
pub use parser::parse_structured_jobs;

use crate::types::post::RawPost;

/// Render a post batch into the text payload the structuring service
/// filters and structures.
pub fn render_posts(posts: &[RawPost]) -> String {
    let mut out = String::new();
    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            out.push_str("\n---\n");
        }
        if let Some(url) = &post.url {
            out.push_str("URL: ");
            out.push_str(url);
            out.push('\n');
        }
        if let Some(author) = &post.author {
            out.push_str("AUTHOR: ");
            out.push_str(author);
            out.push('\n');
        }
        out.push_str(&post.content);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_separates_posts_and_keeps_urls() {
        let posts = vec![
            RawPost::new("first post").with_url("https://example.com/p/1"),
            RawPost::new("second post").with_author("Maria"),
        ];
        let text = render_posts(&posts);
        assert!(text.contains("URL: https://example.com/p/1"));
        assert!(text.contains("AUTHOR: Maria"));
        assert!(text.contains("\n---\n"));
        assert!(text.starts_with("URL:"));
    }
}

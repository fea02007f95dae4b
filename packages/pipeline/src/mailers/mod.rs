//! Mail sender implementations.

pub mod http;

pub use http::HttpMailer;

//! HTTP route handlers.

mod health;
mod scrape;

pub use health::health_handler;
pub use scrape::{
    abort_handler, digest_trigger_handler, manual_trigger_handler, trigger_handler,
};

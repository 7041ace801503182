//! printbot - Slack slash commands that print files, translations and
//! activity reports on an Epson Connect printer.
//!
//! Each command endpoint answers Slack at once with a short acknowledgment
//! and hands the real work to a tracked background task. That task posts
//! exactly one outcome message to the command's `response_url`.
//!
//! # Architecture
//!
//! - axum serves the webhook endpoints ([`api`])
//! - [`worker::Dispatcher`] runs commands ([`features`]) on tokio tasks
//! - slack-morphism reads channels, history and users ([`slack`])
//! - `OpenAI` writes reports, translations and artwork ([`ai`])
//! - extracted text is rendered to PDF ([`documents`]) and sent to
//!   Epson Connect ([`printer`])

pub mod ai;
pub mod api;
pub mod clients;
pub mod core;
pub mod documents;
pub mod errors;
pub mod features;
pub mod printer;
pub mod slack;
pub mod utils;
pub mod worker;

pub use errors::BotError;

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless.
///
/// # Example
///
/// ```
/// printbot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

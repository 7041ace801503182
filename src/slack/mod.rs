//! All Slack-specific functionality

pub mod client;
pub mod command_parser;
pub mod response_builder;

pub use client::SlackClient;
pub use command_parser::{SlackCommandEvent, parse_form_data};

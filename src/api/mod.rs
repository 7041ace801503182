//! HTTP surface: routing, request checks and slash command endpoints

pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod router;
pub mod signature;

pub use router::AppState;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handler;
use super::helpers::method_not_allowed;
use crate::core::config::AppConfig;
use crate::worker::Dispatcher;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }
}

pub fn new(state: AppState) -> Router {
    Router::new()
        // `get` also serves HEAD unless HEAD has its own route.
        .route(
            "/ping",
            get(handler::ping)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route("/art", post(handler::art).fallback(method_not_allowed))
        .route(
            "/print_file",
            post(handler::print_file).fallback(method_not_allowed),
        )
        .route(
            "/print_translate",
            post(handler::print_translate).fallback(method_not_allowed),
        )
        .route(
            "/print_weekly_report",
            post(handler::print_weekly_report).fallback(method_not_allowed),
        )
        .route(
            "/print_monthly_report",
            post(handler::print_monthly_report).fallback(method_not_allowed),
        )
        .route(
            "/print_yearly_report",
            post(handler::print_yearly_report).fallback(method_not_allowed),
        )
        .route(
            "/print_user_report",
            post(handler::print_user_report).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

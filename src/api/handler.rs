//! Slash command endpoints.
//!
//! Every command follows the same accept flow: verify the request, parse the
//! form body, validate the command's own input, hand the work to the
//! dispatcher and answer with the command's acknowledgment. Nothing is
//! dispatched when any step before the hand-off rejects the request.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use tracing::{info, warn};

use super::helpers::{err_response, ok_text};
use super::parsing::{parse_file_name, parse_slack_event, parse_translate_params};
use super::router::AppState;
use super::signature::verify_slack_signature;
use crate::core::models::ReportPeriod;
use crate::features::{
    GenerateArtwork, PrintFile, PrintTranslate, PrintUserReport, PrintWorkspaceReport,
};
use crate::slack::SlackCommandEvent;
use crate::worker::Command;

const SIGNATURE_HEADER: &str = "x-slack-signature";
const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn check_signature(headers: &HeaderMap, body: &str, secret: &str) -> Result<(), Response> {
    let (Some(signature), Some(timestamp)) = (
        header(headers, SIGNATURE_HEADER),
        header(headers, TIMESTAMP_HEADER),
    ) else {
        warn!("Request is missing Slack signature headers");
        return Err(err_response(
            StatusCode::UNAUTHORIZED,
            "Missing Slack signature headers",
        ));
    };
    if verify_slack_signature(body, timestamp, signature, secret) {
        Ok(())
    } else {
        Err(err_response(StatusCode::UNAUTHORIZED, "Invalid Slack signature"))
    }
}

/// Runs the accept flow. `build` either returns the command and its
/// acknowledgment text or the synchronous rejection to send instead.
fn accept<C, F>(state: &AppState, headers: &HeaderMap, body: &Bytes, build: F) -> Response
where
    C: Command,
    F: FnOnce(&SlackCommandEvent) -> Result<(C, String), Response>,
{
    let Ok(body) = std::str::from_utf8(body) else {
        warn!("Request body is not UTF-8");
        return err_response(StatusCode::BAD_REQUEST, "Invalid payload");
    };

    if let Some(secret) = state.config.slack_signing_secret.as_deref() {
        if let Err(rejection) = check_signature(headers, body, secret) {
            return rejection;
        }
    }

    let event = match parse_slack_event(body) {
        Ok(event) => event,
        Err(e) => {
            warn!("{}", e);
            return err_response(StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    if event.response_url.trim().is_empty() {
        warn!("Command {} arrived without a response_url", event.command);
        return err_response(StatusCode::BAD_REQUEST, "Missing response_url");
    }

    let (command, acknowledgment) = match build(&event) {
        Ok(built) => built,
        Err(rejection) => return rejection,
    };

    let name = command.name();
    let task_id = state.dispatcher.dispatch(command, event.response_url.clone());
    info!(
        %task_id,
        user = %event.user_name,
        channel = %event.channel_id,
        "Dispatched {}",
        name
    );

    ok_text(&acknowledgment)
}

pub async fn ping() -> &'static str {
    "Hello world!"
}

#[tracing::instrument(skip_all)]
pub async fn art(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    accept(&state, &headers, &body, |event| {
        let concept = event.text.trim();
        if concept.is_empty() {
            return Err(ok_text(GenerateArtwork::CONCEPT_REQUIRED));
        }
        Ok((
            GenerateArtwork::new(concept),
            GenerateArtwork::ACKNOWLEDGMENT.to_string(),
        ))
    })
}

#[tracing::instrument(skip_all)]
pub async fn print_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    accept(&state, &headers, &body, |event| {
        Ok((
            PrintFile::new(parse_file_name(event.text.trim())),
            PrintFile::ACKNOWLEDGMENT.to_string(),
        ))
    })
}

#[tracing::instrument(skip_all)]
pub async fn print_translate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    accept(&state, &headers, &body, |event| {
        let (file_name, language) = parse_translate_params(event.text.trim());
        Ok((
            PrintTranslate::new(file_name, language),
            PrintTranslate::ACKNOWLEDGMENT.to_string(),
        ))
    })
}

fn workspace_report(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
    period: ReportPeriod,
) -> Response {
    accept(state, headers, body, |_| {
        Ok((
            PrintWorkspaceReport::new(period),
            PrintWorkspaceReport::acknowledgment(period),
        ))
    })
}

#[tracing::instrument(skip_all)]
pub async fn print_weekly_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    workspace_report(&state, &headers, &body, ReportPeriod::Weekly)
}

#[tracing::instrument(skip_all)]
pub async fn print_monthly_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    workspace_report(&state, &headers, &body, ReportPeriod::Monthly)
}

#[tracing::instrument(skip_all)]
pub async fn print_yearly_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    workspace_report(&state, &headers, &body, ReportPeriod::Yearly)
}

#[tracing::instrument(skip_all)]
pub async fn print_user_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    accept(&state, &headers, &body, |event| {
        let username = event.text.trim();
        if username.is_empty() {
            return Err(err_response(
                StatusCode::BAD_REQUEST,
                PrintUserReport::USERNAME_REQUIRED,
            ));
        }
        Ok((
            PrintUserReport::new(username),
            PrintUserReport::ACKNOWLEDGMENT.to_string(),
        ))
    })
}

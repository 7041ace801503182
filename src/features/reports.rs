//! Printed activity reports over a look-back window.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{error, info};

use super::collect::{fetch_messages_for_period, fetch_user_messages_for_period, find_user_id_by_name};
use super::{Services, render_and_print, window_start};
use crate::ai::prompt_builder::report_request;
use crate::core::models::{CallbackMessage, ReportPeriod};
use crate::errors::BotError;
use crate::worker::Command;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `(start, end)` dates of the window ending at `now`.
fn date_range(period: ReportPeriod, now: DateTime<Local>) -> (String, String) {
    (
        window_start(now, period.weeks()).format(DATE_FORMAT).to_string(),
        now.format(DATE_FORMAT).to_string(),
    )
}

/// Drops a leading copy of `title` the model sometimes echoes back.
fn strip_title<'a>(content: &'a str, title: &str) -> &'a str {
    content
        .strip_prefix(title)
        .map_or(content, str::trim_start)
}

/// `/print_weekly_report`, `/print_monthly_report` and `/print_yearly_report`.
#[derive(Debug, Clone)]
pub struct PrintWorkspaceReport {
    period: ReportPeriod,
    now: DateTime<Local>,
}

impl PrintWorkspaceReport {
    #[must_use]
    pub fn new(period: ReportPeriod) -> Self {
        Self::at(period, Local::now())
    }

    #[must_use]
    pub fn at(period: ReportPeriod, now: DateTime<Local>) -> Self {
        Self { period, now }
    }

    #[must_use]
    pub fn acknowledgment(period: ReportPeriod) -> String {
        format!(
            "Generating your {} report...",
            period.label().to_ascii_lowercase()
        )
    }

    #[must_use]
    pub fn title(&self) -> String {
        let (start, end) = date_range(self.period, self.now);
        format!("{} Report ({start} to {end})", self.period.label())
    }
}

#[async_trait]
impl Command for PrintWorkspaceReport {
    fn name(&self) -> &'static str {
        match self.period {
            ReportPeriod::Weekly => "print_weekly_report",
            ReportPeriod::Monthly => "print_monthly_report",
            ReportPeriod::Yearly => "print_yearly_report",
        }
    }

    async fn run(&self, services: &Services) -> Result<CallbackMessage, BotError> {
        let oldest = window_start(self.now, self.period.weeks()).timestamp();
        let messages = fetch_messages_for_period(services.chat.as_ref(), oldest).await?;

        let content = if messages.trim().is_empty() {
            format!(
                "No messages to summarize for the past {}.",
                self.period.noun()
            )
        } else {
            services
                .llm
                .complete(report_request(self.period, &messages))
                .await?
        };

        let title = self.title();
        let report = format!("{title}\n\n{}", strip_title(&content, &title));
        let job_id = render_and_print(services, &report).await?;

        info!(job_id = %job_id, "{} report printed", self.period.label());
        Ok(CallbackMessage::text(format!(
            "{} report has been sent to the printer. Print Job ID: {job_id}",
            self.period.label()
        )))
    }

    fn failure(&self, error: &BotError) -> CallbackMessage {
        CallbackMessage::text(format!("Error printing report: {error}"))
    }
}

/// `/print_user_report`: one user's messages over the past week.
#[derive(Debug, Clone)]
pub struct PrintUserReport {
    username: String,
    now: DateTime<Local>,
}

impl PrintUserReport {
    pub const ACKNOWLEDGMENT: &'static str = "Generating your weekly report...";
    pub const USERNAME_REQUIRED: &'static str = "Username is required";

    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self::at(username, Local::now())
    }

    #[must_use]
    pub fn at(username: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            username: username.into(),
            now,
        }
    }
}

#[async_trait]
impl Command for PrintUserReport {
    fn name(&self) -> &'static str {
        "print_user_report"
    }

    async fn run(&self, services: &Services) -> Result<CallbackMessage, BotError> {
        let name = &self.username;
        let Some(user_id) = find_user_id_by_name(services.chat.as_ref(), name).await? else {
            return Ok(CallbackMessage::text(format!("User '{name}' not found")));
        };

        let period = ReportPeriod::Weekly;
        let oldest = window_start(self.now, period.weeks()).timestamp();
        let messages =
            fetch_user_messages_for_period(services.chat.as_ref(), &user_id, oldest).await?;
        if messages.trim().is_empty() {
            return Ok(CallbackMessage::text(format!(
                "No messages found for user '{name}' in the past week."
            )));
        }

        // A failed completion gets its own wording, distinct from print failures.
        let summary = match services.llm.complete(report_request(period, &messages)).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Report generation for {} failed: {}", name, e);
                return Ok(CallbackMessage::text(format!(
                    "Failed to generate report: {e}"
                )));
            }
        };

        let (start, end) = date_range(period, self.now);
        let report = format!("Weekly Report for {name} ({start} to {end})\n\n{summary}");
        let job_id = render_and_print(services, &report).await?;

        Ok(CallbackMessage::text(format!(
            "Weekly report for {name} has been sent to the printer. Print Job ID: {job_id}"
        )))
    }

    fn failure(&self, error: &BotError) -> CallbackMessage {
        CallbackMessage::text(format!(
            "Error printing report for {}: {error}",
            self.username
        ))
    }
}

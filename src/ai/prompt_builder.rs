//! Prompt construction for report and translation completions

use crate::clients::CompletionRequest;
use crate::core::models::{Language, ReportPeriod};

/// Output budget for every completion the bot issues.
pub const MAX_COMPLETION_TOKENS: u32 = 2048;

/// Zero temperature keeps reports and translations factual.
pub const COMPLETION_TEMPERATURE: f32 = 0.0;

#[must_use]
pub fn report_request(period: ReportPeriod, messages_text: &str) -> CompletionRequest {
    let noun = period.noun();
    let adjective = period.label().to_ascii_lowercase();
    let user = if matches!(period, ReportPeriod::Yearly) {
        format!(
            "Based on the following messages, generate a {adjective} report in bullet points summarizing key events and updates throughout the {noun}:\n\n{messages_text}"
        )
    } else {
        format!(
            "Based on the following messages, generate a {adjective} report in bullet points summarizing key events and updates:\n\n{messages_text}"
        )
    };

    CompletionRequest {
        system: format!(
            "You are a helpful assistant that generates {adjective} reports from text."
        ),
        user,
        max_tokens: MAX_COMPLETION_TOKENS,
        temperature: COMPLETION_TEMPERATURE,
    }
}

#[must_use]
pub fn translation_request(text: &str, language: Language) -> CompletionRequest {
    CompletionRequest {
        system: "You are a helpful assistant that translates text.".to_string(),
        user: format!(
            "Please translate the following text into {}:\n\n{text}",
            language.as_str()
        ),
        max_tokens: MAX_COMPLETION_TOKENS,
        temperature: COMPLETION_TEMPERATURE,
    }
}

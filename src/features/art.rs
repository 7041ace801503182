use async_trait::async_trait;
use tracing::info;

use super::Services;
use crate::core::models::CallbackMessage;
use crate::errors::BotError;
use crate::worker::Command;

/// `/art`: generates an image from a free-text concept.
#[derive(Debug, Clone)]
pub struct GenerateArtwork {
    concept: String,
}

impl GenerateArtwork {
    pub const ACKNOWLEDGMENT: &'static str = "Generating your artwork...";
    pub const CONCEPT_REQUIRED: &'static str = "Artwork concept is required.";

    #[must_use]
    pub fn new(concept: impl Into<String>) -> Self {
        Self {
            concept: concept.into(),
        }
    }
}

#[async_trait]
impl Command for GenerateArtwork {
    fn name(&self) -> &'static str {
        "art"
    }

    async fn run(&self, services: &Services) -> Result<CallbackMessage, BotError> {
        let image_url = services.llm.generate_image(&self.concept).await?;
        info!("Artwork generated");
        Ok(CallbackMessage::artwork(&image_url))
    }

    fn failure(&self, error: &BotError) -> CallbackMessage {
        CallbackMessage::text(format!("Failed to generate artwork: {error}"))
    }
}

pub mod chat;
pub mod prompt;

pub use chat::ChatNarrativeGenerator;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;

/// Builds the narrative generator when the configuration enables one.
pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Option<ChatNarrativeGenerator>> {
    match config.narrative_settings() {
        Some(settings) => {
            tracing::info!(
                "Narrative enrichment enabled ({} via {})",
                settings.model,
                settings.endpoint
            );
            ChatNarrativeGenerator::new(settings).map(Some)
        }
        None => {
            tracing::debug!("Narrative enrichment disabled");
            Ok(None)
        }
    }
}

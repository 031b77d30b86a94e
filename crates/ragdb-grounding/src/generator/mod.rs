//! Implementations of the language-model boundary
//! ([`ragdb_core::traits::Generator`]).
//!
//! `from_settings` picks the OpenAI-compatible client when an API key is
//! configured and falls back to [`UnavailableGenerator`] otherwise, so the
//! pipeline always runs.

pub mod openai;

use async_trait::async_trait;
use ragdb_core::config::GenerationSettings;
use ragdb_core::error::GenerationError;
use ragdb_core::traits::Generator;
use tracing::{info, warn};

pub use openai::OpenAiGenerator;

/// Stands in when no model or credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGenerator;

#[async_trait]
impl Generator for UnavailableGenerator {
    fn is_available(&self) -> bool {
        false
    }

    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

pub fn from_settings(settings: &GenerationSettings) -> Box<dyn Generator> {
    if !settings.is_configured() {
        info!("generation.api_key is empty; answers will be placeholders");
        return Box::new(UnavailableGenerator);
    }
    match OpenAiGenerator::new(settings.clone()) {
        Ok(generator) => Box::new(generator),
        Err(e) => {
            warn!(error = %e, "could not build model client; answers will be placeholders");
            Box::new(UnavailableGenerator)
        }
    }
}

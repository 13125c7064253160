use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::agent::stateless_llm::{OpenAICompatibleLLM, StatelessLLMInterface};
use crate::config::Settings;

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create the provider client described by `settings`.
    ///
    /// Fails when no API key is configured or the HTTP client cannot be
    /// built; callers treat either as an initialization failure.
    pub fn create_llm(settings: &Settings) -> Result<Arc<dyn StatelessLLMInterface>> {
        info!("Initializing LLM: model={}", settings.model);

        let api_key = settings
            .groq_api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY not found in environment variables"))?;

        Ok(Arc::new(OpenAICompatibleLLM::new(
            settings.model.clone(),
            settings.groq_base_url.clone(),
            api_key,
            settings.temperature,
            settings.request_timeout_secs.map(Duration::from_secs),
        )?))
    }
}

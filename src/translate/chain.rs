use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use super::prompt::PromptTemplate;
use crate::agent::stateless_llm::StatelessLLMInterface;
use crate::agent::StatelessLLMFactory;
use crate::config::Settings;
use crate::error::TranslationError;

/// Prompt template piped into a provider, output trimmed to a string.
///
/// Built once at start-up and shared read-only between requests.
pub struct TranslationChain {
    prompt: PromptTemplate,
    llm: Arc<dyn StatelessLLMInterface>,
}

/// Outcome of start-up chain construction.
#[derive(Clone)]
pub enum ChainState {
    Ready(Arc<TranslationChain>),
    Unavailable(String),
}

impl ChainState {
    /// Build the chain from settings, recording why if it cannot be built.
    pub fn initialize(settings: &Settings) -> Self {
        match TranslationChain::from_settings(settings) {
            Ok(chain) => {
                info!(model = chain.model(), "translation chain initialized");
                ChainState::Ready(Arc::new(chain))
            }
            Err(e) => {
                error!(error = %e, "translation chain setup failed");
                ChainState::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChainState::Ready(_))
    }

    pub fn chain(&self) -> Result<&Arc<TranslationChain>, TranslationError> {
        match self {
            ChainState::Ready(chain) => Ok(chain),
            ChainState::Unavailable(reason) => {
                Err(TranslationError::ServiceUnavailable(reason.clone()))
            }
        }
    }
}

impl TranslationChain {
    pub fn new(prompt: PromptTemplate, llm: Arc<dyn StatelessLLMInterface>) -> Self {
        Self { prompt, llm }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let llm = StatelessLLMFactory::create_llm(settings)?;
        Ok(Self::new(PromptTemplate::translation()?, llm))
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Translate `text` into `language`.
    ///
    /// The provider call runs on its own task: a caller that goes away
    /// does not cancel it, the result is just dropped.
    pub async fn invoke(&self, language: &str, text: &str) -> Result<String, TranslationError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %request_id,
            language,
            model = self.model(),
            chars = text.chars().count(),
            "translation started"
        );

        let values = HashMap::from([("language", language), ("text", text)]);
        let messages = self
            .prompt
            .format_messages(&values)
            .map_err(|e| TranslationError::Internal(e.to_string()))?;

        let llm = Arc::clone(&self.llm);
        let handle = tokio::spawn(async move { llm.chat_completion(messages).await });

        let result = match handle.await {
            Ok(Ok(output)) => extract_translation(output),
            Ok(Err(e)) => Err(TranslationError::from(e)),
            Err(join_err) => Err(TranslationError::Internal(join_err.to_string())),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(translation) => info!(
                %request_id,
                elapsed_ms,
                chars = translation.chars().count(),
                "translation completed"
            ),
            Err(e) => error!(%request_id, elapsed_ms, error = %e, "translation failed"),
        }
        result
    }
}

/// Accept only non-empty string output, trimmed.
fn extract_translation(output: Option<String>) -> Result<String, TranslationError> {
    let text = output.ok_or(TranslationError::InvalidOutput)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TranslationError::InvalidOutput);
    }
    Ok(trimmed.to_string())
}

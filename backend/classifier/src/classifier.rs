use std::sync::Arc;

use tracing::{info, warn};

use truthlens_core::{AnalysisResult, LlmProvider, LlmRequest, TruthLensError};

use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::reply::parse_reply;

/// Sampling settings sent with every classification request.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Builds the prompt, calls the provider once, and normalizes the reply.
#[derive(Clone)]
pub struct Classifier {
    provider: Arc<dyn LlmProvider>,
    settings: ClassifierSettings,
}

impl Classifier {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ClassifierSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Call the classifier and return its reply text unparsed.
    ///
    /// Whitespace-only input fails before any network call.
    pub async fn classify_raw(&self, text: &str) -> Result<String, TruthLensError> {
        if text.trim().is_empty() {
            return Err(TruthLensError::EmptyInput);
        }

        let request = LlmRequest {
            model: self.settings.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_prompt(text),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        info!(
            provider = self.provider.name(),
            model = %request.model,
            chars = text.chars().count(),
            "Classifying text"
        );

        match self.provider.complete(&request).await {
            Ok(response) => {
                info!(latency_ms = response.latency_ms, "Classifier replied");
                Ok(response.content)
            }
            Err(e) => {
                warn!(error = %e, "Classification failed");
                Err(e)
            }
        }
    }

    pub async fn classify_text(&self, text: &str) -> Result<AnalysisResult, TruthLensError> {
        let reply = self.classify_raw(text).await?;
        Ok(parse_reply(&reply))
    }
}

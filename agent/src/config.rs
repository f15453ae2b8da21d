use std::env;
use std::sync::Arc;

use anyhow::Result;

use crate::agent_service::FormAgent;
use crate::gemini_service::{GeminiService, DEFAULT_GEMINI_MODEL};
use crate::llm::LlmProvider;
use crate::openrouter_service::{OpenRouterService, DEFAULT_OPENROUTER_MODEL};

/// Provider configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let openrouter_api_key = env::var("OPENROUTER_API_KEY").ok().filter(|k| !k.is_empty());
        let openrouter_model =
            env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string());

        Ok(Self {
            gemini_api_key,
            gemini_model,
            openrouter_api_key,
            openrouter_model,
        })
    }

    /// Build the agent: Gemini as primary, OpenRouter as fallback when a
    /// key is configured.
    pub fn build_agent(&self) -> FormAgent {
        let primary: Arc<dyn LlmProvider> =
            Arc::new(GeminiService::new(&self.gemini_api_key, &self.gemini_model));

        let fallback: Option<Arc<dyn LlmProvider>> = self.openrouter_api_key.as_ref().map(|key| {
            log::info!("Fallback provider enabled: openrouter ({})", self.openrouter_model);
            Arc::new(OpenRouterService::new(key, &self.openrouter_model)) as Arc<dyn LlmProvider>
        });

        FormAgent::new(primary, fallback)
    }
}

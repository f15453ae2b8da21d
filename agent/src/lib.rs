pub mod agent_service;
pub mod cache;
pub mod config;
pub mod document_processor;
pub mod gemini_service;
pub mod llm;
pub mod models;
pub mod openrouter_service;
pub mod report;

pub use agent_service::FormAgent;
pub use cache::{CacheKey, ResponseCache};
pub use config::AgentConfig;
pub use document_processor::DocumentProcessor;
pub use gemini_service::GeminiService;
pub use llm::{CompletionRequest, LlmProvider, MockProvider};
pub use models::*;
pub use openrouter_service::OpenRouterService;
pub use report::build_report;

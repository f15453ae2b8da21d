use anyhow::Result;
use async_trait::async_trait;

/// A single completion request. All agent operations collapse to one prompt
/// string; there is no chat history or system prompt to carry.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.3,
            max_output_tokens: 1000,
        }
    }
}

/// Trait for hosted LLM backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openrouter").
    fn name(&self) -> &str;

    /// Send a completion request and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// A provider that returns canned responses, for tests.
#[derive(Default)]
pub struct MockProvider {
    responses: std::sync::Mutex<Vec<String>>,
    calls: std::sync::atomic::AtomicUsize,
    prompts: std::sync::Mutex<Vec<String>>,
    fail: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue responses returned in order; once exhausted, a fixed fallback
    /// string is returned.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queued: Vec<String> = responses.into_iter().map(Into::into).collect();
        queued.reverse();
        Self {
            responses: std::sync::Mutex::new(queued),
            ..Self::default()
        }
    }

    /// A provider whose every call fails, for exercising the fallback path.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if self.fail {
            anyhow::bail!("mock provider failure");
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "Mock response".to_string()))
    }
}

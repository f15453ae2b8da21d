use crate::llm::{CompletionRequest, LlmProvider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini `generateContent` REST client.
pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiService {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[async_trait]
impl LlmProvider for GeminiService {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Auth, quota and model errors all arrive this way; surface the
            // body so the user sees what the API said.
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let answer = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_else(|| "No response generated".to_string());

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn parses_the_first_candidate_text() {
        let app = Router::new().fallback(|| async {
            Json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "The total is $120.00"}]}}]
            }))
        });
        let service = GeminiService::new("test-key", "test-model").with_base_url(serve(app).await);

        let answer = service
            .complete(&CompletionRequest::new("What is the total?"))
            .await
            .unwrap();

        assert_eq!(answer, "The total is $120.00");
    }

    #[tokio::test]
    async fn empty_candidates_fall_back_to_a_placeholder() {
        let app = Router::new().fallback(|| async { Json(serde_json::json!({"candidates": []})) });
        let service = GeminiService::new("test-key", "test-model").with_base_url(serve(app).await);

        let answer = service.complete(&CompletionRequest::new("anything")).await.unwrap();

        assert_eq!(answer, "No response generated");
    }

    #[tokio::test]
    async fn non_2xx_surfaces_the_status_and_body() {
        let app = Router::new().fallback(|| async {
            (StatusCode::TOO_MANY_REQUESTS, "quota exceeded for model test-model")
        });
        let service = GeminiService::new("test-key", "test-model").with_base_url(serve(app).await);

        let err = service
            .complete(&CompletionRequest::new("anything"))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("quota exceeded"));
    }
}

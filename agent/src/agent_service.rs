use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cache::{CacheKey, ResponseCache};
use crate::document_processor::DocumentProcessor;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::models::*;

/// The core agent: extraction plus the three LLM operations, each memoized
/// so an identical query never triggers a second API call.
pub struct FormAgent {
    primary: Arc<dyn LlmProvider>,
    fallback: Option<Arc<dyn LlmProvider>>,
    processor: DocumentProcessor,
    qa_cache: ResponseCache<String>,
    summary_cache: ResponseCache<String>,
    holistic_cache: ResponseCache<HolisticAnalysis>,
}

impl FormAgent {
    pub fn new(primary: Arc<dyn LlmProvider>, fallback: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            primary,
            fallback,
            processor: DocumentProcessor::new(),
            qa_cache: ResponseCache::new(),
            summary_cache: ResponseCache::new(),
            holistic_cache: ResponseCache::new(),
        }
    }

    /// Extract text from an uploaded file.
    pub fn process_form(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        self.processor.process_form(filename, bytes)
    }

    /// Answer a question against a single document.
    pub async fn answer_question(&self, document: &Document, question: &str) -> Result<String> {
        let key = CacheKey::single(&document.id, question);
        if let Some(answer) = self.qa_cache.get(&key).await {
            log::debug!("QA cache hit for {}", document.name);
            return Ok(answer);
        }

        let prompt = format!(
            "Document content: '''{}'''\n\
             User question: {}\n\
             Extract the exact information asked or reply 'No answer found' if unavailable.",
            document.text, question
        );
        let answer = self.complete(&CompletionRequest::new(prompt)).await?;
        self.qa_cache.insert(key, answer.clone()).await;
        Ok(answer)
    }

    /// Produce a short summary of a single document.
    pub async fn generate_summary(&self, document: &Document) -> Result<String> {
        let key = CacheKey::single(&document.id, "summary");
        if let Some(summary) = self.summary_cache.get(&key).await {
            log::debug!("Summary cache hit for {}", document.name);
            return Ok(summary);
        }

        let prompt = format!(
            "Summarize this document with a two-line introduction followed by bullet points \
             with key information (dates, names, topics):\nDocument Text: '''{}'''",
            document.text
        );
        let summary = self.complete(&CompletionRequest::new(prompt)).await?;
        self.summary_cache.insert(key, summary.clone()).await;
        Ok(summary)
    }

    /// Run the same question over every selected document, then synthesize
    /// the per-document answers into one final answer.
    pub async fn holistic_analysis(
        &self,
        documents: &[&Document],
        prompt: &str,
    ) -> Result<HolisticAnalysis> {
        if documents.len() < 2 {
            bail!("at least two documents are required for holistic analysis");
        }

        let key = CacheKey::many(documents.iter().map(|d| d.id.clone()), prompt);
        if let Some(analysis) = self.holistic_cache.get(&key).await {
            log::debug!("Holistic cache hit for {} documents", documents.len());
            return Ok(analysis);
        }

        let mut intermediary_results = Vec::with_capacity(documents.len());
        for document in documents {
            let qa_prompt = format!(
                "Document: '''{}'''\nQuestion: {}\nAnswer based on the document.",
                document.text, prompt
            );
            let answer = self.complete(&CompletionRequest::new(qa_prompt)).await?;
            intermediary_results.push(DocumentAnswer {
                document: document.name.clone(),
                answer,
            });
        }

        let combined_prompt = format!(
            "Answers from multiple documents:\n{}\nSynthesize a concise final answer to: {}.",
            intermediary_results
                .iter()
                .map(|r| format!("{}: {}", r.document, r.answer))
                .collect::<Vec<_>>()
                .join("\n"),
            prompt
        );
        let final_synthesis = self.complete(&CompletionRequest::new(combined_prompt)).await?;

        let analysis = HolisticAnalysis {
            prompt: prompt.to_string(),
            intermediary_results,
            final_synthesis,
        };
        self.holistic_cache.insert(key, analysis.clone()).await;
        Ok(analysis)
    }

    /// Ask the primary provider; on failure, retry once against the
    /// fallback if one is configured.
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self.primary.complete(request).await {
            Ok(text) => Ok(text),
            Err(primary_err) => match &self.fallback {
                Some(fallback) => {
                    log::warn!(
                        "{} request failed: {:#}; retrying with {}",
                        self.primary.name(),
                        primary_err,
                        fallback.name()
                    );
                    fallback.complete(request).await
                }
                None => Err(primary_err),
            },
        }
    }
}

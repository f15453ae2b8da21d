use std::collections::HashMap;

use tokio::sync::RwLock;

/// Key for a memoized LLM response: the documents the query ran over plus
/// the exact prompt text. An entry can only be hit by the query that
/// produced it, which is the one invariant this cache carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub document_ids: Vec<String>,
    pub prompt: String,
}

impl CacheKey {
    pub fn single(document_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            document_ids: vec![document_id.into()],
            prompt: prompt.into(),
        }
    }

    pub fn many<I, S>(document_ids: I, prompt: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            document_ids: document_ids.into_iter().map(Into::into).collect(),
            prompt: prompt.into(),
        }
    }
}

/// Plain memoization over query responses. No eviction, no TTL: the session
/// is single-user and dies with the process.
pub struct ResponseCache<T> {
    entries: RwLock<HashMap<CacheKey, T>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<T> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, value: T) {
        self.entries.write().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl<T: Clone> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hit_requires_the_exact_prompt_and_documents() {
        let cache = ResponseCache::new();
        let key = CacheKey::single("doc-1", "What is the total?");
        cache.insert(key.clone(), "$120.00".to_string()).await;

        assert_eq!(cache.get(&key).await.as_deref(), Some("$120.00"));
        assert!(cache
            .get(&CacheKey::single("doc-1", "What is the date?"))
            .await
            .is_none());
        assert!(cache
            .get(&CacheKey::single("doc-2", "What is the total?"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn multi_document_keys_are_order_sensitive() {
        let cache = ResponseCache::new();
        let key = CacheKey::many(["a", "b"], "compare dates");
        cache.insert(key.clone(), "b is later".to_string()).await;

        assert!(cache.get(&key).await.is_some());
        assert!(cache.get(&CacheKey::many(["b", "a"], "compare dates")).await.is_none());
        assert_eq!(cache.len().await, 1);
    }
}

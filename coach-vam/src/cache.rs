//! Bounded in-memory answer cache.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use coach_core::{CoachResponse, ExamVariant};

/// A bounded cache of settled responses keyed by question identity.
#[async_trait]
pub trait BoundedCache: Send + Sync {
    /// Look up a cached response.
    async fn get(&self, key: &str) -> Option<CoachResponse>;

    /// Insert a response, evicting as needed to stay within capacity.
    async fn insert(&self, key: String, response: CoachResponse);

    /// Number of cached responses.
    async fn len(&self) -> usize;

    /// Whether the cache holds nothing.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// The cache key for a question: hex-encoded SHA-256 over the variant,
/// question text, and optional topic and subtopic.
pub fn cache_key(
    variant: ExamVariant,
    question: &str,
    topic: Option<&str>,
    subtopic: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    for part in [variant.as_str(), question, topic.unwrap_or(""), subtopic.unwrap_or("")] {
        hasher.update(part.as_bytes());
        hasher.update([0x1f]);
    }
    hex::encode(hasher.finalize())
}

struct FifoInner {
    entries: HashMap<String, CoachResponse>,
    order: VecDeque<String>,
}

/// A FIFO-evicting [`BoundedCache`].
///
/// Eviction is strictly insertion-order: re-inserting an existing key
/// replaces the value without refreshing its position. A deliberate
/// simplification over LRU; answer lookups are cheap to redo.
pub struct FifoCache {
    capacity: usize,
    inner: RwLock<FifoInner>,
}

impl FifoCache {
    /// Create a cache holding at most `capacity` responses.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(FifoInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }
}

#[async_trait]
impl BoundedCache for FifoCache {
    async fn get(&self, key: &str) -> Option<CoachResponse> {
        self.inner.read().await.entries.get(key).cloned()
    }

    async fn insert(&self, key: String, response: CoachResponse) {
        let mut inner = self.inner.write().await;
        if inner.entries.insert(key.clone(), response).is_none() {
            inner.order.push_back(key);
        }
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(key = %oldest, "evicted oldest cached answer");
        }
    }

    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::{ResponseMetadata, TrustScore};

    fn response(answer: &str) -> CoachResponse {
        CoachResponse {
            answer: answer.to_string(),
            verified: true,
            trust_score: TrustScore::zero(),
            confidence: 0.0,
            sources: Vec::new(),
            suggestions: Vec::new(),
            metadata: ResponseMetadata {
                exam_variant: ExamVariant::CalcAb,
                topic: None,
                subtopic: None,
                difficulty: None,
                retry_count: 0,
            },
        }
    }

    #[test]
    fn key_is_stable_and_sensitive_to_every_part() {
        let base = cache_key(ExamVariant::CalcAb, "q", Some("t"), None);
        assert_eq!(base, cache_key(ExamVariant::CalcAb, "q", Some("t"), None));
        assert_ne!(base, cache_key(ExamVariant::CalcBc, "q", Some("t"), None));
        assert_ne!(base, cache_key(ExamVariant::CalcAb, "q2", Some("t"), None));
        assert_ne!(base, cache_key(ExamVariant::CalcAb, "q", None, None));
        assert_ne!(base, cache_key(ExamVariant::CalcAb, "q", None, Some("t")));
        // hex SHA-256
        assert_eq!(base.len(), 64);
    }

    #[tokio::test]
    async fn get_returns_inserted_response() {
        let cache = FifoCache::new(4);
        cache.insert("k".into(), response("2x")).await;
        assert_eq!(cache.get("k").await.map(|r| r.answer), Some("2x".to_string()));
        assert!(cache.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn evicts_oldest_first() {
        let cache = FifoCache::new(2);
        cache.insert("a".into(), response("1")).await;
        cache.insert("b".into(), response("2")).await;
        cache.insert("c".into(), response("3")).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn reinsert_replaces_without_growing() {
        let cache = FifoCache::new(2);
        cache.insert("a".into(), response("1")).await;
        cache.insert("a".into(), response("updated")).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("a").await.map(|r| r.answer), Some("updated".to_string()));
    }

    #[tokio::test]
    async fn capacity_is_never_exceeded() {
        let cache = FifoCache::new(3);
        for i in 0..10 {
            cache.insert(format!("k{i}"), response("x")).await;
            assert!(cache.len().await <= 3);
        }
    }
}

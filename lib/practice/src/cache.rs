//! Bounded cache of generated questions.

use crate::difficulty::Difficulty;
use crate::question::PracticeQuestion;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Limits for a [`QuestionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCacheConfig {
    /// Questions kept per (service, difficulty, topic) key.
    pub max_per_key: usize,
    /// Distinct keys kept.
    pub max_keys: usize,
}

impl Default for QuestionCacheConfig {
    fn default() -> Self {
        Self {
            max_per_key: 20,
            max_keys: 500,
        }
    }
}

type CacheKey = (String, Difficulty, String);

#[derive(Debug, Default)]
struct CacheState {
    questions: HashMap<CacheKey, VecDeque<PracticeQuestion>>,
    // Keys in first-insertion order, oldest at the front.
    order: VecDeque<CacheKey>,
}

/// Generated questions, keyed by service, difficulty and topic.
///
/// Oldest questions are dropped past `max_per_key`; oldest keys are dropped
/// past `max_keys`.
#[derive(Debug)]
pub struct QuestionCache {
    config: QuestionCacheConfig,
    state: Mutex<CacheState>,
}

impl QuestionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(config: QuestionCacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Records a generated question under its own service, difficulty and
    /// topic.
    pub fn insert(&self, question: PracticeQuestion) {
        if self.config.max_per_key == 0 || self.config.max_keys == 0 {
            return;
        }

        let key = (
            question.service.clone(),
            question.difficulty,
            question.topic.clone(),
        );
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if !state.questions.contains_key(&key) {
            while state.order.len() >= self.config.max_keys {
                let Some(oldest) = state.order.pop_front() else {
                    break;
                };
                state.questions.remove(&oldest);
            }
            state.order.push_back(key.clone());
        }

        let bucket = state.questions.entry(key).or_default();
        bucket.push_back(question);
        while bucket.len() > self.config.max_per_key {
            bucket.pop_front();
        }
    }

    /// Returns the cached questions for a key, oldest first.
    #[must_use]
    pub fn get(&self, service: &str, difficulty: Difficulty, topic: &str) -> Vec<PracticeQuestion> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .questions
            .get(&(service.to_string(), difficulty, topic.to_string()))
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns every cached question, grouped by key in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PracticeQuestion> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .order
            .iter()
            .filter_map(|key| state.questions.get(key))
            .flat_map(|bucket| bucket.iter().cloned())
            .collect()
    }

    /// Total number of cached questions.
    #[must_use]
    pub fn total(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.questions.values().map(VecDeque::len).sum()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.questions.len()
    }

    /// Returns the limits in effect.
    #[must_use]
    pub fn config(&self) -> QuestionCacheConfig {
        self.config
    }
}

impl Default for QuestionCache {
    fn default() -> Self {
        Self::new(QuestionCacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(service: &str, topic: &str, text: &str) -> PracticeQuestion {
        PracticeQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: 1,
            explanation: "because".to_string(),
            service: service.to_string(),
            difficulty: Difficulty::Beginner,
            topic: topic.to_string(),
        }
    }

    #[test]
    fn groups_by_key() {
        let cache = QuestionCache::default();
        cache.insert(question("s3", "general", "one"));
        cache.insert(question("s3", "general", "two"));
        cache.insert(question("ec2", "general", "three"));

        assert_eq!(cache.total(), 3);
        assert_eq!(cache.key_count(), 2);
        assert_eq!(cache.get("s3", Difficulty::Beginner, "general").len(), 2);
        assert!(cache.get("s3", Difficulty::Advanced, "general").is_empty());
    }

    #[test]
    fn drops_oldest_question_past_per_key_cap() {
        let cache = QuestionCache::new(QuestionCacheConfig {
            max_per_key: 2,
            max_keys: 10,
        });
        cache.insert(question("s3", "general", "one"));
        cache.insert(question("s3", "general", "two"));
        cache.insert(question("s3", "general", "three"));

        let texts: Vec<_> = cache
            .get("s3", Difficulty::Beginner, "general")
            .into_iter()
            .map(|q| q.question)
            .collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn drops_oldest_key_past_key_cap() {
        let cache = QuestionCache::new(QuestionCacheConfig {
            max_per_key: 5,
            max_keys: 2,
        });
        cache.insert(question("s3", "general", "one"));
        cache.insert(question("ec2", "general", "two"));
        cache.insert(question("iam", "general", "three"));

        assert_eq!(cache.key_count(), 2);
        assert!(cache.get("s3", Difficulty::Beginner, "general").is_empty());
        let snapshot: Vec<_> = cache.snapshot().into_iter().map(|q| q.question).collect();
        assert_eq!(snapshot, vec!["two", "three"]);
    }

    #[test]
    fn zero_caps_disable_caching() {
        let cache = QuestionCache::new(QuestionCacheConfig {
            max_per_key: 0,
            max_keys: 10,
        });
        cache.insert(question("s3", "general", "one"));
        assert_eq!(cache.total(), 0);
    }
}

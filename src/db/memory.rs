// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process sorted-set store for local development and tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::store::SortedStore;
use crate::error::AppError;

#[derive(Default)]
struct SortedSet {
    scores: HashMap<String, i64>,
    ordered: BTreeSet<(i64, String)>,
}

impl SortedSet {
    fn insert(&mut self, score: i64, member: &str) {
        if let Some(previous) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&(previous, member.to_string()));
        }
        self.ordered.insert((score, member.to_string()));
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&(score, member.to_string()));
                true
            }
            None => false,
        }
    }
}

/// Sorted sets, indexes and plain values held in concurrent maps.
///
/// Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    sets: Arc<DashMap<String, SortedSet>>,
    indexes: Arc<DashMap<String, HashMap<String, i64>>>,
    values: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SortedStore for MemoryStore {
    async fn add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError> {
        self.sets
            .entry(key.to_string())
            .or_default()
            .insert(score, member);
        Ok(())
    }

    async fn remove(&self, key: &str, member: &str) -> Result<bool, AppError> {
        Ok(self
            .sets
            .get_mut(key)
            .map(|mut set| set.remove(member))
            .unwrap_or(false))
    }

    async fn range_rev(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<String>, AppError> {
        if stop < start {
            return Ok(Vec::new());
        }
        Ok(self
            .sets
            .get(key)
            .map(|set| {
                set.ordered
                    .iter()
                    .rev()
                    .skip(start)
                    .take(stop - start + 1)
                    .map(|(_, member)| member.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn range_by_score(&self, key: &str, score: i64) -> Result<Vec<String>, AppError> {
        Ok(self
            .sets
            .get(key)
            .map(|set| {
                set.ordered
                    .range((score, String::new())..)
                    .take_while(|(s, _)| *s == score)
                    .map(|(_, member)| member.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        key: &str,
        old: &str,
        score: i64,
        new: &str,
    ) -> Result<bool, AppError> {
        // The shard write lock is held for the whole swap.
        let Some(mut set) = self.sets.get_mut(key) else {
            return Ok(false);
        };
        if !set.remove(old) {
            return Ok(false);
        }
        set.insert(score, new);
        Ok(true)
    }

    async fn index_get(&self, key: &str, id: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .indexes
            .get(key)
            .and_then(|index| index.get(id).copied()))
    }

    async fn index_set(&self, key: &str, id: &str, score: i64) -> Result<(), AppError> {
        self.indexes
            .entry(key.to_string())
            .or_default()
            .insert(id.to_string(), score);
        Ok(())
    }

    async fn index_remove(&self, key: &str, id: &str) -> Result<(), AppError> {
        if let Some(mut index) = self.indexes.get_mut(key) {
            index.remove(id);
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.values.get(key).map(|value| value.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_range_rev_orders_by_score() {
        let store = MemoryStore::new();
        store.add("k", 10, "a").await.unwrap();
        store.add("k", 30, "c").await.unwrap();
        store.add("k", 20, "b").await.unwrap();

        assert_eq!(store.range_rev("k", 0, 9).await.unwrap(), ["c", "b", "a"]);
        assert_eq!(store.range_rev("k", 1, 1).await.unwrap(), ["b"]);
        assert!(store.range_rev("missing", 0, 9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_readd_moves_score() {
        let store = MemoryStore::new();
        store.add("k", 10, "a").await.unwrap();
        store.add("k", 20, "b").await.unwrap();
        store.add("k", 30, "a").await.unwrap();

        assert_eq!(store.range_rev("k", 0, 9).await.unwrap(), ["a", "b"]);
        assert!(store.range_by_score("k", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_by_score_exact() {
        let store = MemoryStore::new();
        store.add("k", 5, "x").await.unwrap();
        store.add("k", 5, "y").await.unwrap();
        store.add("k", 6, "z").await.unwrap();

        assert_eq!(store.range_by_score("k", 5).await.unwrap(), ["x", "y"]);
    }

    #[tokio::test]
    async fn test_replace_is_compare_and_swap() {
        let store = MemoryStore::new();
        store.add("k", 1, "v1").await.unwrap();

        assert!(store.replace("k", "v1", 2, "v2").await.unwrap());
        assert!(!store.replace("k", "v1", 3, "v3").await.unwrap());
        assert_eq!(store.range_rev("k", 0, 9).await.unwrap(), ["v2"]);
    }

    #[tokio::test]
    async fn test_remove_reports_presence() {
        let store = MemoryStore::new();
        store.add("k", 1, "a").await.unwrap();

        assert!(store.remove("k", "a").await.unwrap());
        assert!(!store.remove("k", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_index_and_values() {
        let store = MemoryStore::new();
        store.index_set("k:index", "abc12345", 42).await.unwrap();
        assert_eq!(store.index_get("k:index", "abc12345").await.unwrap(), Some(42));

        store.index_remove("k:index", "abc12345").await.unwrap();
        assert_eq!(store.index_get("k:index", "abc12345").await.unwrap(), None);

        assert_eq!(store.get("goal").await.unwrap(), None);
        store.set("goal", "{}").await.unwrap();
        assert_eq!(store.get("goal").await.unwrap().as_deref(), Some("{}"));
    }
}

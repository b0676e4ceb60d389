// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The sorted-set key-value contract every backend implements.
//!
//! A sorted set maps unique string members to integer scores. Members are
//! opaque serialized records; the journal layer owns their format. Each
//! sorted set may have a companion index mapping record ids to scores, and
//! plain keys hold single JSON values.

use async_trait::async_trait;

use crate::error::AppError;

#[async_trait]
pub trait SortedStore: Send + Sync {
    /// Insert `member` with `score`, or move it to `score` if already present.
    async fn add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError>;

    /// Remove `member`. Returns whether it was present.
    async fn remove(&self, key: &str, member: &str) -> Result<bool, AppError>;

    /// Members by descending score, ranks `start..=stop`.
    async fn range_rev(&self, key: &str, start: usize, stop: usize)
        -> Result<Vec<String>, AppError>;

    /// All members holding exactly `score`.
    async fn range_by_score(&self, key: &str, score: i64) -> Result<Vec<String>, AppError>;

    /// Atomically swap `old` for `new` at `score`.
    ///
    /// Returns `false` without writing when `old` is no longer a member.
    async fn replace(
        &self,
        key: &str,
        old: &str,
        score: i64,
        new: &str,
    ) -> Result<bool, AppError>;

    async fn index_get(&self, key: &str, id: &str) -> Result<Option<i64>, AppError>;

    async fn index_set(&self, key: &str, id: &str, score: i64) -> Result<(), AppError>;

    async fn index_remove(&self, key: &str, id: &str) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

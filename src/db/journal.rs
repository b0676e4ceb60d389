// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed, per-user access to the journal collections.
//!
//! Records are stored as JSON members of a sorted set keyed
//! `user:<username>:<entity>`, scored by their sort key in epoch millis.
//! Each collection keeps an id -> score index so by-id lookups only touch
//! the members sharing that score. Records written without an index entry
//! are still found by scanning the most recent [`LOOKUP_WINDOW`] members.

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::keys::{index_key, user_key};
use super::store::SortedStore;
use crate::error::AppError;
use crate::models::{Identified, UserGoal};

/// Number of most recent members scanned when the index has no entry.
pub const LOOKUP_WINDOW: usize = 200;

/// Sorted collections owned by each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Workouts,
    Plans,
    Routines,
}

impl Collection {
    pub fn entity(self) -> &'static str {
        match self {
            Collection::Workouts => "workouts",
            Collection::Plans => "plans",
            Collection::Routines => "routines",
        }
    }
}

/// A decoded record along with the exact member text it was read from.
///
/// The member text is what compare-and-swap and removal match against.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub value: T,
    pub member: String,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

/// Journal repository for one authenticated user.
#[derive(Clone)]
pub struct Journal {
    store: Arc<dyn SortedStore>,
    username: String,
}

impl Journal {
    pub fn new(store: Arc<dyn SortedStore>, username: impl Into<String>) -> Self {
        Self {
            store,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn key(&self, collection: Collection) -> String {
        user_key(&self.username, collection.entity())
    }

    /// Newest-first records, at most `limit`. Members that fail to decode are
    /// skipped.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<T>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let members = self
            .store
            .range_rev(&self.key(collection), 0, limit - 1)
            .await?;

        Ok(members
            .iter()
            .filter_map(|member| decode(collection, member))
            .collect())
    }

    /// Find a record by id.
    pub async fn find<T>(&self, collection: Collection, id: &str) -> Result<Option<Stored<T>>, AppError>
    where
        T: DeserializeOwned + Identified,
    {
        let key = self.key(collection);

        if let Some(score) = self.store.index_get(&index_key(&key), id).await? {
            let members = self.store.range_by_score(&key, score).await?;
            if let Some(found) = match_id(collection, members, id) {
                return Ok(Some(found));
            }
        }

        let recent = self.store.range_rev(&key, 0, LOOKUP_WINDOW - 1).await?;
        let found = match_id(collection, recent, id);
        if found.is_some() {
            tracing::debug!(
                collection = collection.entity(),
                id,
                "Record found outside the index"
            );
        }
        Ok(found)
    }

    /// Add a record and index it.
    pub async fn insert<T>(&self, collection: Collection, score: i64, value: &T) -> Result<(), AppError>
    where
        T: Serialize + Identified,
    {
        let key = self.key(collection);
        let member = encode(value)?;

        self.store.add(&key, score, &member).await?;
        self.store
            .index_set(&index_key(&key), value.record_id(), score)
            .await
    }

    /// Compare-and-swap `old` for `new`. Returns `false` if `old` was changed
    /// or removed since it was read.
    pub async fn replace<T>(
        &self,
        collection: Collection,
        old: &Stored<T>,
        score: i64,
        new: &T,
    ) -> Result<bool, AppError>
    where
        T: Serialize + Identified,
    {
        let key = self.key(collection);
        let member = encode(new)?;

        if !self.store.replace(&key, &old.member, score, &member).await? {
            return Ok(false);
        }
        self.store
            .index_set(&index_key(&key), new.record_id(), score)
            .await?;
        Ok(true)
    }

    /// Remove a record and its index entry. Returns whether the member was
    /// still present.
    pub async fn remove<T: Identified>(
        &self,
        collection: Collection,
        stored: &Stored<T>,
    ) -> Result<bool, AppError> {
        let key = self.key(collection);
        let removed = self.store.remove(&key, &stored.member).await?;
        self.store
            .index_remove(&index_key(&key), stored.value.record_id())
            .await?;
        Ok(removed)
    }

    /// Ids of the `count` most recent records.
    pub async fn recent_ids(
        &self,
        collection: Collection,
        count: usize,
    ) -> Result<HashSet<String>, AppError> {
        Ok(self
            .list::<IdOnly>(collection, count)
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect())
    }

    /// Whether `id` has an index entry.
    pub async fn is_indexed(&self, collection: Collection, id: &str) -> Result<bool, AppError> {
        let key = self.key(collection);
        Ok(self.store.index_get(&index_key(&key), id).await?.is_some())
    }

    pub async fn get_goal(&self) -> Result<Option<UserGoal>, AppError> {
        let raw = self.store.get(&user_key(&self.username, "goal")).await?;
        Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(goal) => Some(goal),
            Err(e) => {
                tracing::warn!(error = %e, "Stored goal is unreadable");
                None
            }
        }))
    }

    pub async fn set_goal(&self, goal: &UserGoal) -> Result<(), AppError> {
        self.store
            .set(&user_key(&self.username, "goal"), &encode(goal)?)
            .await
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize record: {}", e)))
}

fn decode<T: DeserializeOwned>(collection: Collection, member: &str) -> Option<T> {
    match serde_json::from_str(member) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(
                collection = collection.entity(),
                error = %e,
                "Skipping malformed member"
            );
            None
        }
    }
}

fn match_id<T>(collection: Collection, members: Vec<String>, id: &str) -> Option<Stored<T>>
where
    T: DeserializeOwned + Identified,
{
    members.into_iter().find_map(|member| {
        let value: T = decode(collection, &member)?;
        (value.record_id() == id).then_some(Stored { value, member })
    })
}

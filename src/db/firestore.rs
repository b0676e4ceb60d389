// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed sorted-set store.
//!
//! Layout:
//! - `sorted_members`: one document per (key, member) holding its score
//! - `sorted_index`: one document per (key, record id) holding its score
//! - `kv_values`: one document per plain key
//!
//! Document ids are SHA-256 digests of the logical key so arbitrary member
//! text never has to be escaped into a Firestore path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::collections;
use super::store::SortedStore;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemberDoc {
    key: String,
    member: String,
    score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexDoc {
    key: String,
    id: String,
    score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValueDoc {
    key: String,
    value: String,
}

fn doc_id(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Read one member document through `db`, which may be bound to a
/// transaction.
async fn read_member(
    db: &firestore::FirestoreDb,
    key: &str,
    member: &str,
) -> Result<Option<MemberDoc>, AppError> {
    db.fluent()
        .select()
        .by_id_in(collections::SORTED_MEMBERS)
        .obj()
        .one(&doc_id(&[key, member]))
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Firestore store client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Emulator connection with a dummy bearer token.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Offline client: every operation fails with a database error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn get_member(&self, key: &str, member: &str) -> Result<Option<MemberDoc>, AppError> {
        read_member(self.get_client()?, key, member).await
    }
}

#[async_trait]
impl SortedStore for FirestoreStore {
    async fn add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError> {
        let doc = MemberDoc {
            key: key.to_string(),
            member: member.to_string(),
            score,
        };
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SORTED_MEMBERS)
            .document_id(doc_id(&[key, member]))
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str, member: &str) -> Result<bool, AppError> {
        if self.get_member(key, member).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SORTED_MEMBERS)
            .document_id(doc_id(&[key, member]))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
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
        let key = key.to_string();
        let limit = u32::try_from(stop - start + 1).unwrap_or(u32::MAX);
        let offset = u32::try_from(start).unwrap_or(u32::MAX);

        let docs: Vec<MemberDoc> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SORTED_MEMBERS)
            .filter(move |q| q.for_all([q.field("key").eq(key.clone())]))
            .order_by([("score", firestore::FirestoreQueryDirection::Descending)])
            .offset(offset)
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(|doc| doc.member).collect())
    }

    async fn range_by_score(&self, key: &str, score: i64) -> Result<Vec<String>, AppError> {
        let key = key.to_string();

        let docs: Vec<MemberDoc> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SORTED_MEMBERS)
            .filter(move |q| {
                q.for_all([
                    q.field("key").eq(key.clone()),
                    q.field("score").eq(score),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(|doc| doc.member).collect())
    }

    async fn replace(
        &self,
        key: &str,
        old: &str,
        score: i64,
        new: &str,
    ) -> Result<bool, AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Reading through the transaction registers `old` for conflict
        // detection, so a concurrent replace of the same member aborts.
        let tx_db = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );
        if read_member(&tx_db, key, old).await?.is_none() {
            let _ = transaction.rollback().await;
            return Ok(false);
        }

        client
            .fluent()
            .delete()
            .from(collections::SORTED_MEMBERS)
            .document_id(doc_id(&[key, old]))
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add deletion to transaction: {}", e))
            })?;

        let doc = MemberDoc {
            key: key.to_string(),
            member: new.to_string(),
            score,
        };
        client
            .fluent()
            .update()
            .in_col(collections::SORTED_MEMBERS)
            .document_id(doc_id(&[key, new]))
            .object(&doc)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add member to transaction: {}", e))
            })?;

        if let Err(e) = transaction.commit().await {
            // Lost the race: another replace already consumed `old`
            if self.get_member(key, old).await?.is_none() {
                tracing::debug!(key, "Replace aborted by a concurrent writer");
                return Ok(false);
            }
            return Err(AppError::Database(format!("Transaction commit failed: {}", e)));
        }

        Ok(true)
    }

    async fn index_get(&self, key: &str, id: &str) -> Result<Option<i64>, AppError> {
        let doc: Option<IndexDoc> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SORTED_INDEX)
            .obj()
            .one(&doc_id(&[key, id]))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.map(|doc| doc.score))
    }

    async fn index_set(&self, key: &str, id: &str, score: i64) -> Result<(), AppError> {
        let doc = IndexDoc {
            key: key.to_string(),
            id: id.to_string(),
            score,
        };
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SORTED_INDEX)
            .document_id(doc_id(&[key, id]))
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn index_remove(&self, key: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SORTED_INDEX)
            .document_id(doc_id(&[key, id]))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let doc: Option<ValueDoc> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::KV_VALUES)
            .obj()
            .one(&doc_id(&[key]))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.map(|doc| doc.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let doc = ValueDoc {
            key: key.to_string(),
            value: value.to_string(),
        };
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::KV_VALUES)
            .document_id(doc_id(&[key]))
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

//! Persistence layer: a sorted-set store abstraction, its adapters, and the
//! typed journal repository built on top.

pub mod firestore;
pub mod journal;
pub mod memory;
pub mod store;

pub use firestore::FirestoreStore;
pub use journal::{Collection, Journal, Stored};
pub use memory::MemoryStore;
pub use store::SortedStore;

/// Firestore collection names.
pub mod collections {
    /// One document per (sorted-set key, member)
    pub const SORTED_MEMBERS: &str = "sorted_members";
    /// Secondary id -> score index entries
    pub const SORTED_INDEX: &str = "sorted_index";
    /// Plain single-value keys
    pub const KV_VALUES: &str = "kv_values";
}

/// Store key layout. Every key is namespaced by the owning username.
pub mod keys {
    pub fn user_key(username: &str, entity: &str) -> String {
        format!("user:{}:{}", username, entity)
    }

    /// Key of the id -> score index for a sorted collection.
    pub fn index_key(key: &str) -> String {
        format!("{}:index", key)
    }

}

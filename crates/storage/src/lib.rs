//! Storage seam for the mongocap auditor
//!
//! The auditor never talks to a database driver directly; it goes through
//! the [`CollectionCatalog`] trait. Implementations: a private
//! MongoDB-backed catalog and [`mock::MockCatalog`], a deterministic
//! in-memory catalog for tests and offline runs.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod error;
mod factory;
pub mod mock;

// Keep the driver-backed module private
mod mongo;

pub use factory::create_catalog;

use async_trait::async_trait;
use mongocap_core::error::Result;

/// Statistics for a single collection, as reported by the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    /// Whether the collection is capped (bounded, circular-buffer storage)
    pub capped: bool,
    /// Maximum size in bytes; present when the collection is capped
    pub max_size_bytes: Option<u64>,
}

/// Catalog operations over one database's collections
///
/// Enumeration order is whatever the driver returns; callers must not
/// assume it is stable across runs.
#[async_trait]
pub trait CollectionCatalog: Send + Sync {
    /// Names of all collections currently present in the database
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Statistics for one collection
    async fn collection_stats(&self, name: &str) -> Result<CollectionStats>;

    /// Convert an uncapped collection to a capped collection with the
    /// given byte-size limit. Irreversible without a full rebuild.
    async fn convert_to_capped(&self, name: &str, size_bytes: u64) -> Result<()>;
}

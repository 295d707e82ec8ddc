//! In-memory collection catalog for tests and offline runs
//!
//! Deterministic: collections enumerate in insertion order, and every
//! convert command issued through the trait is recorded so tests can
//! assert exactly which commands a run produced.

use crate::error::StorageError;
use crate::{CollectionCatalog, CollectionStats};
use async_trait::async_trait;
use mongocap_core::error::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct MockCatalog {
    collections: Mutex<Vec<(String, CollectionStats)>>,
    issued: Mutex<Vec<(String, u64)>>,
    fail_stats_for: Mutex<Option<String>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from `(name, capped)` pairs, enumerated in the
    /// given order
    pub fn with_collections<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let catalog = Self::new();
        for (name, capped) in collections {
            catalog.add_collection(name, capped);
        }
        catalog
    }

    pub fn add_collection(&self, name: impl Into<String>, capped: bool) {
        lock(&self.collections).push((
            name.into(),
            CollectionStats {
                capped,
                max_size_bytes: None,
            },
        ));
    }

    /// Makes the next stats fetch for `name` fail, to exercise the
    /// fail-fast path
    pub fn poison_stats(&self, name: impl Into<String>) {
        *lock(&self.fail_stats_for) = Some(name.into());
    }

    /// Every convert command issued so far, as `(name, size_bytes)`
    /// pairs in issue order
    pub fn issued_commands(&self) -> Vec<(String, u64)> {
        lock(&self.issued).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl CollectionCatalog for MockCatalog {
    async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(lock(&self.collections)
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn collection_stats(&self, name: &str) -> Result<CollectionStats> {
        if lock(&self.fail_stats_for).as_deref() == Some(name) {
            return Err(StorageError::StatsFailed {
                collection: name.to_string(),
                message: "injected failure".to_string(),
            }
            .into());
        }

        lock(&self.collections)
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, stats)| *stats)
            .ok_or_else(|| StorageError::CollectionNotFound(name.to_string()).into())
    }

    async fn convert_to_capped(&self, name: &str, size_bytes: u64) -> Result<()> {
        let mut collections = lock(&self.collections);
        let entry = collections
            .iter_mut()
            .find(|(candidate, _)| candidate == name)
            .ok_or_else(|| StorageError::CollectionNotFound(name.to_string()))?;

        if entry.1.capped {
            return Err(StorageError::CommandRejected {
                command: "convertToCapped".to_string(),
                message: format!("collection '{name}' is already capped"),
            }
            .into());
        }

        entry.1 = CollectionStats {
            capped: true,
            max_size_bytes: Some(size_bytes),
        };
        lock(&self.issued).push((name.to_string(), size_bytes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongocap_core::Error;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mock_enumerates_in_insertion_order() {
        let catalog = MockCatalog::with_collections([
            ("zeta_realtime", false),
            ("alpha", true),
            ("mid_realtime_feed", false),
        ]);

        let names = catalog.list_collections().await.unwrap();
        assert_eq!(names, vec!["zeta_realtime", "alpha", "mid_realtime_feed"]);
    }

    #[tokio::test]
    async fn test_mock_convert_records_command_and_flips_stats() {
        let catalog = MockCatalog::with_collections([("events_realtime", false)]);

        catalog
            .convert_to_capped("events_realtime", 4_194_304)
            .await
            .unwrap();

        let stats = catalog.collection_stats("events_realtime").await.unwrap();
        assert!(stats.capped);
        assert_eq!(stats.max_size_bytes, Some(4_194_304));
        assert_eq!(
            catalog.issued_commands(),
            vec![("events_realtime".to_string(), 4_194_304)]
        );
    }

    #[tokio::test]
    async fn test_mock_rejects_converting_capped_collection() {
        let catalog = MockCatalog::with_collections([("events_realtime", true)]);

        let err = catalog
            .convert_to_capped("events_realtime", 4_194_304)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(catalog.issued_commands().is_empty());
    }

    #[tokio::test]
    async fn test_mock_stats_for_unknown_collection() {
        let catalog = MockCatalog::new();
        let err = catalog.collection_stats("missing").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_mock_poisoned_stats_fail() {
        let catalog = MockCatalog::with_collections([("events_realtime", false)]);
        catalog.poison_stats("events_realtime");

        let err = catalog
            .collection_stats("events_realtime")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}

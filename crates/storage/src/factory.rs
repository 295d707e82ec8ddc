use crate::error::StorageError;
use crate::mock::MockCatalog;
use crate::mongo::MongoCatalog;
use crate::CollectionCatalog;
use mongocap_core::{config::DatabaseConfig, Error};
use std::sync::Arc;

/// Creates a collection catalog based on configuration.
///
/// Returns a trait object so the auditor stays independent of the backing
/// driver. The `"mock"` provider yields an empty in-memory catalog; an
/// unknown provider is a configuration error rather than a silent
/// fallback, since the real catalog mutates schema.
///
/// # Errors
/// Returns an error if the provider is unknown or the database cannot be
/// reached.
pub async fn create_catalog(config: &DatabaseConfig) -> Result<Arc<dyn CollectionCatalog>, Error> {
    match config.provider.as_str() {
        "mongodb" => {
            let catalog = MongoCatalog::connect(&config.uri, &config.database).await?;
            Ok(Arc::new(catalog) as Arc<dyn CollectionCatalog>)
        }
        "mock" => Ok(Arc::new(MockCatalog::new()) as Arc<dyn CollectionCatalog>),
        other => Err(StorageError::InvalidConfig(format!(
            "Unknown database provider '{other}' (expected \"mongodb\" or \"mock\")"
        ))
        .into()),
    }
}

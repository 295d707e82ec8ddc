//! MongoDB-backed collection catalog
//!
//! Statistics come from the `collStats` command and conversion goes
//! through `convertToCapped`, matching what a mongo shell session would
//! issue.

use crate::error::StorageError;
use crate::{CollectionCatalog, CollectionStats};
use async_trait::async_trait;
use mongocap_core::error::Result;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Database};
use tracing::debug;

pub(crate) struct MongoCatalog {
    db: Database,
}

impl MongoCatalog {
    /// Connect to the server and bind to one database. Pings the server
    /// so a bad endpoint fails here rather than on the first stats call.
    pub(crate) async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        let db = client.database(database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        debug!(uri, database, "connected to MongoDB");
        Ok(Self { db })
    }
}

#[async_trait]
impl CollectionCatalog for MongoCatalog {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let names = self
            .db
            .list_collection_names()
            .await
            .map_err(|e| StorageError::CommandRejected {
                command: "listCollections".to_string(),
                message: e.to_string(),
            })?;
        Ok(names)
    }

    async fn collection_stats(&self, name: &str) -> Result<CollectionStats> {
        let stats = self
            .db
            .run_command(doc! { "collStats": name })
            .await
            .map_err(|e| StorageError::StatsFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(CollectionStats {
            capped: flag(&stats, "capped"),
            max_size_bytes: stats.get("maxSize").and_then(to_u64),
        })
    }

    async fn convert_to_capped(&self, name: &str, size_bytes: u64) -> Result<()> {
        let size = i64::try_from(size_bytes).map_err(|_| StorageError::CommandRejected {
            command: "convertToCapped".to_string(),
            message: format!("size {size_bytes} exceeds the command's signed 64-bit range"),
        })?;

        self.db
            .run_command(doc! { "convertToCapped": name, "size": size })
            .await
            .map_err(|e| StorageError::CommandRejected {
                command: "convertToCapped".to_string(),
                message: e.to_string(),
            })?;

        debug!(collection = name, size_bytes, "converted to capped");
        Ok(())
    }
}

/// Reads a boolean flag that older servers report as a number
fn flag(doc: &Document, key: &str) -> bool {
    match doc.get(key) {
        Some(Bson::Boolean(b)) => *b,
        Some(Bson::Int32(n)) => *n != 0,
        Some(Bson::Int64(n)) => *n != 0,
        Some(Bson::Double(n)) => *n != 0.0,
        _ => false,
    }
}

fn to_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(n) => u64::try_from(*n).ok(),
        Bson::Int64(n) => u64::try_from(*n).ok(),
        Bson::Double(n) if *n >= 0.0 => Some(*n as u64),
        _ => None,
    }
}

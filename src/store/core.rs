use crate::error::{TextfoldError, TextfoldResult};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Database operations struct that provides unified access to all persisted state.
#[derive(Clone)]
pub struct DbOperations {
    /// The underlying sled database instance
    db: sled::Db,
    /// Cached trees for performance
    pub(crate) records_tree: sled::Tree,
    pub(crate) users_tree: sled::Tree,
    pub(crate) counters_tree: sled::Tree,
}

impl DbOperations {
    /// Creates a new DbOperations instance with all required trees
    pub fn new(db: sled::Db) -> Result<Self, sled::Error> {
        let records_tree = db.open_tree("analysis_records")?;
        let users_tree = db.open_tree("users")?;
        let counters_tree = db.open_tree("owner_counters")?;

        Ok(Self {
            db,
            records_tree,
            users_tree,
            counters_tree,
        })
    }

    /// Opens the sled database at the given path and wraps it
    pub fn open(path: &Path) -> TextfoldResult<Self> {
        let db = sled::open(path)?;
        Ok(Self::new(db)?)
    }

    /// Gets a reference to the underlying database
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Generic function to store any serializable item in a specific tree
    pub(crate) fn store_in_tree<T: Serialize>(
        &self,
        tree: &sled::Tree,
        key: &str,
        item: &T,
    ) -> TextfoldResult<()> {
        let bytes = serde_json::to_vec(item)
            .map_err(|e| TextfoldError::Serialization(format!("Serialization failed: {}", e)))?;

        tree.insert(key.as_bytes(), bytes)
            .map_err(|e| TextfoldError::Database(format!("Store failed: {}", e)))?;

        // Ensure the data is durably written to disk
        tree.flush()
            .map_err(|e| TextfoldError::Database(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// Generic function to retrieve any deserializable item from a specific tree
    pub(crate) fn get_from_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        key: &str,
    ) -> TextfoldResult<Option<T>> {
        match tree.get(key.as_bytes()) {
            Ok(Some(bytes)) => {
                let item = serde_json::from_slice(&bytes).map_err(|e| {
                    TextfoldError::Serialization(format!("Deserialization failed: {}", e))
                })?;
                Ok(Some(item))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(TextfoldError::Database(format!("Retrieval failed: {}", e))),
        }
    }

    /// List all values in a tree
    pub(crate) fn list_items_in_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
    ) -> TextfoldResult<Vec<T>> {
        let mut items = Vec::new();
        for result in tree.iter() {
            let (key, value) = result
                .map_err(|e| TextfoldError::Database(format!("Tree iteration failed: {}", e)))?;
            let item = serde_json::from_slice(&value).map_err(|e| {
                TextfoldError::Serialization(format!(
                    "Deserialization failed for key '{}': {}",
                    String::from_utf8_lossy(&key),
                    e
                ))
            })?;
            items.push(item);
        }
        Ok(items)
    }

    /// Delete an item from a specific tree, reporting whether it existed
    pub(crate) fn delete_from_tree(&self, tree: &sled::Tree, key: &str) -> TextfoldResult<bool> {
        let existed = tree
            .remove(key.as_bytes())
            .map_err(|e| TextfoldError::Database(format!("Delete failed: {}", e)))?
            .is_some();

        tree.flush()
            .map_err(|e| TextfoldError::Database(format!("Flush failed: {}", e)))?;

        Ok(existed)
    }

    /// Check if a key exists in a specific tree
    pub(crate) fn exists_in_tree(&self, tree: &sled::Tree, key: &str) -> TextfoldResult<bool> {
        tree.contains_key(key.as_bytes())
            .map_err(|e| TextfoldError::Database(format!("Existence check failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generic_tree_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let ops = DbOperations::open(temp_dir.path()).unwrap();

        ops.store_in_tree(&ops.records_tree, "k1", &serde_json::json!({"a": 1}))
            .unwrap();

        let value: Option<serde_json::Value> = ops.get_from_tree(&ops.records_tree, "k1").unwrap();
        assert_eq!(value.unwrap()["a"], 1);

        assert!(ops.exists_in_tree(&ops.records_tree, "k1").unwrap());
        assert!(ops.delete_from_tree(&ops.records_tree, "k1").unwrap());
        assert!(!ops.exists_in_tree(&ops.records_tree, "k1").unwrap());
        assert!(!ops.delete_from_tree(&ops.records_tree, "k1").unwrap());
    }
}

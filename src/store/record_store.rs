use super::core::DbOperations;
use crate::analysis::{AnalysisRecord, UpdatePatch};
use crate::error::{TextfoldError, TextfoldResult};

impl DbOperations {
    /// Returns the next sequence number for the given owner.
    ///
    /// The counter is a single big-endian u64 per owner, advanced with an
    /// atomic compare-and-swap loop, so concurrent callers for the same
    /// owner can never observe the same number. The first call for an
    /// owner yields 1.
    pub fn next_num(&self, owner: &str) -> TextfoldResult<u64> {
        let new = self
            .counters_tree
            .update_and_fetch(owner.as_bytes(), |old| {
                let current = old
                    .and_then(|bytes| bytes.try_into().ok().map(u64::from_be_bytes))
                    .unwrap_or(0);
                Some(current.saturating_add(1).to_be_bytes().to_vec())
            })
            .map_err(|e| TextfoldError::Database(format!("Counter update failed: {}", e)))?
            .ok_or_else(|| TextfoldError::Database("Counter update returned nothing".to_string()))?;

        let bytes: [u8; 8] = new
            .as_ref()
            .try_into()
            .map_err(|_| TextfoldError::Database("Corrupt counter value".to_string()))?;
        Ok(u64::from_be_bytes(bytes))
    }

    /// Persists a freshly built record, guarding `id` uniqueness.
    pub fn insert_record(&self, record: &AnalysisRecord) -> TextfoldResult<()> {
        if self.exists_in_tree(&self.records_tree, &record.id)? {
            return Err(TextfoldError::Database(format!(
                "Record id '{}' already exists",
                record.id
            )));
        }
        self.store_in_tree(&self.records_tree, &record.id, record)
    }

    /// Fetches one record by id, regardless of owner.
    pub fn get_record(&self, id: &str) -> TextfoldResult<Option<AnalysisRecord>> {
        self.get_from_tree(&self.records_tree, id)
    }

    /// Returns the owner's records ordered by timestamp descending, capped at `limit`.
    pub fn list_for_owner(&self, owner: &str, limit: usize) -> TextfoldResult<Vec<AnalysisRecord>> {
        let mut records: Vec<AnalysisRecord> = self
            .list_items_in_tree(&self.records_tree)?
            .into_iter()
            .filter(|r: &AnalysisRecord| r.owner == owner)
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.num.cmp(&a.num)));
        records.truncate(limit);
        Ok(records)
    }

    /// Returns the owner's full record set ordered by sequence number ascending.
    pub fn records_for_export(&self, owner: &str) -> TextfoldResult<Vec<AnalysisRecord>> {
        let mut records: Vec<AnalysisRecord> = self
            .list_items_in_tree(&self.records_tree)?
            .into_iter()
            .filter(|r: &AnalysisRecord| r.owner == owner)
            .collect();
        records.sort_by_key(|r| r.num);
        Ok(records)
    }

    /// Applies the provided subset of editable fields to the record matching
    /// owner + id. Returns the updated record, or `None` when no record
    /// matched; absence and foreign ownership are not distinguished.
    pub fn update_record(
        &self,
        owner: &str,
        id: &str,
        patch: &UpdatePatch,
    ) -> TextfoldResult<Option<AnalysisRecord>> {
        let mut record = match self.get_record(id)? {
            Some(r) if r.owner == owner => r,
            _ => return Ok(None),
        };

        patch.apply_to(&mut record);
        self.store_in_tree(&self.records_tree, id, &record)?;
        Ok(Some(record))
    }

    /// Removes the record matching owner + id. Returns `false` when no
    /// record matched; absence and foreign ownership are not distinguished.
    pub fn delete_record(&self, owner: &str, id: &str) -> TextfoldResult<bool> {
        match self.get_record(id)? {
            Some(r) if r.owner == owner => self.delete_from_tree(&self.records_tree, id),
            _ => Ok(false),
        }
    }
}

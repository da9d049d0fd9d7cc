use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{CountdownError, CountdownResult};

use super::record::TimerRecord;

/// Persistence collaborator: timer records addressable by id and by owner.
pub trait TimerStore {
    /// Record by id; `Ok(None)` when absent.
    fn get(&self, id: &str) -> CountdownResult<Option<TimerRecord>>;
    /// All records owned by `owner`, ordered by id.
    fn list_by_owner(&self, owner: &str) -> CountdownResult<Vec<TimerRecord>>;
    /// Insert or replace a record.
    fn insert(&mut self, record: TimerRecord) -> CountdownResult<()>;
    /// Remove a record; returns whether it existed.
    fn delete(&mut self, id: &str) -> CountdownResult<bool>;
}

/// [`TimerStore`] backed by an ordered map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTimerStore {
    records: BTreeMap<String, TimerRecord>,
}

impl InMemoryTimerStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON array of records.
    pub fn from_json(json: &str) -> CountdownResult<Self> {
        let rows: Vec<TimerRecord> = serde_json::from_str(json)
            .map_err(|e| CountdownError::validation(format!("timer records json: {e}")))?;
        let mut store = Self::new();
        for row in rows {
            if row.id.trim().is_empty() {
                return Err(CountdownError::validation("timer record id must be non-empty"));
            }
            store.records.insert(row.id.clone(), row);
        }
        Ok(store)
    }

    /// Load from a JSON file holding an array of records.
    pub fn from_path(path: &Path) -> CountdownResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read timer records '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TimerStore for InMemoryTimerStore {
    fn get(&self, id: &str) -> CountdownResult<Option<TimerRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn list_by_owner(&self, owner: &str) -> CountdownResult<Vec<TimerRecord>> {
        Ok(self
            .records
            .values()
            .filter(|r| r.user_id.as_deref() == Some(owner))
            .cloned()
            .collect())
    }

    fn insert(&mut self, record: TimerRecord) -> CountdownResult<()> {
        if record.id.trim().is_empty() {
            return Err(CountdownError::validation("timer record id must be non-empty"));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> CountdownResult<bool> {
        Ok(self.records.remove(id).is_some())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/serve/store.rs"]
mod tests;

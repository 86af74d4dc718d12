use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Record;
use crate::storage::engine::{RecordCursor, StorageEngine};

#[derive(Debug)]
struct IndexState {
    unique: bool,
    // index key -> primary keys, both ordered
    entries: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug)]
struct CollectionState {
    primary_key_field: String,
    records: BTreeMap<String, Record>,
    indexes: BTreeMap<String, IndexState>,
}

#[derive(Debug, Default)]
struct EngineState {
    collections: BTreeMap<String, CollectionState>,
    dropped: bool,
}

/// In-memory reference implementation of the storage engine contract.
/// `BTreeMap` keys give the ascending primary-key scan order; secondary
/// indexes are maintained on every put and delete.
#[derive(Clone, Debug, Default)]
pub struct MemoryEngine {
    state: Arc<RwLock<EngineState>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        MemoryEngine {
            state: Arc::new(RwLock::new(EngineState::default())),
        }
    }
}

impl StorageEngine for MemoryEngine {
    type Cursor = MemoryCursor;

    async fn open_collection(&self, name: &str, primary_key_field: &str) -> Result<()> {
        let mut state = self.state.write();
        guard_open(&state)?;
        state
            .collections
            .entry(name.to_string())
            .or_insert_with(|| CollectionState {
                primary_key_field: primary_key_field.to_string(),
                records: BTreeMap::new(),
                indexes: BTreeMap::new(),
            });
        Ok(())
    }

    async fn create_index(&self, collection: &str, field: &str, unique: bool) -> Result<()> {
        let mut state = self.state.write();
        guard_open(&state)?;
        let col = collection_mut(&mut state, collection)?;
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (key, record) in &col.records {
            if let Some(index_key) = record.get(field).and_then(index_key) {
                entries.entry(index_key).or_default().insert(key.clone());
            }
        }
        col.indexes
            .insert(field.to_string(), IndexState { unique, entries });
        Ok(())
    }

    async fn scan_ascending(&self, collection: &str) -> Result<Self::Cursor> {
        let state = self.state.read();
        guard_open(&state)?;
        let col = collection_ref(&state, collection)?;
        Ok(MemoryCursor {
            state: self.state.clone(),
            collection: collection.to_string(),
            keys: col.records.keys().cloned().collect(),
        })
    }

    async fn exact_match(
        &self,
        collection: &str,
        index: &str,
        value: &Value,
    ) -> Result<Self::Cursor> {
        let state = self.state.read();
        guard_open(&state)?;
        let col = collection_ref(&state, collection)?;
        let idx = col.indexes.get(index).ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("index \"{}\" not declared on \"{}\"", index, collection),
            )
        })?;
        let keys: VecDeque<String> = index_key(value)
            .and_then(|key| idx.entries.get(&key))
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        Ok(MemoryCursor {
            state: self.state.clone(),
            collection: collection.to_string(),
            keys,
        })
    }

    async fn put(&self, collection: &str, record: Record) -> Result<()> {
        let mut state = self.state.write();
        guard_open(&state)?;
        let col = collection_mut(&mut state, collection)?;
        let key = record
            .get(&col.primary_key_field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidArgument,
                    format!("record missing primary key \"{}\"", col.primary_key_field),
                )
            })?
            .to_string();

        for (field, idx) in &col.indexes {
            if !idx.unique {
                continue;
            }
            let Some(index_key) = record.get(field).and_then(index_key) else {
                continue;
            };
            if let Some(holders) = idx.entries.get(&index_key) {
                if holders.iter().any(|holder| *holder != key) {
                    return Err(Error::new(
                        ErrorKind::Storage,
                        format!("unique index \"{}\" already holds \"{}\"", field, index_key),
                    ));
                }
            }
        }

        if let Some(previous) = col.records.remove(&key) {
            unindex(col, &key, &previous);
        }
        for (field, idx) in col.indexes.iter_mut() {
            if let Some(index_key) = record.get(field).and_then(index_key) {
                idx.entries.entry(index_key).or_default().insert(key.clone());
            }
        }
        col.records.insert(key, record);
        Ok(())
    }

    async fn delete(&self, collection: &str, primary_key: &str) -> Result<()> {
        let mut state = self.state.write();
        guard_open(&state)?;
        let col = collection_mut(&mut state, collection)?;
        if let Some(previous) = col.records.remove(primary_key) {
            unindex(col, primary_key, &previous);
        }
        Ok(())
    }

    async fn drop_all(&self) -> Result<()> {
        let mut state = self.state.write();
        guard_open(&state)?;
        state.collections.clear();
        state.dropped = true;
        debug!("storage dropped");
        Ok(())
    }
}

fn guard_open(state: &EngineState) -> Result<()> {
    if state.dropped {
        return Err(Error::new(
            ErrorKind::InvalidState,
            "storage has been dropped".to_string(),
        ));
    }
    Ok(())
}

fn collection_ref<'a>(state: &'a EngineState, name: &str) -> Result<&'a CollectionState> {
    state.collections.get(name).ok_or_else(|| {
        Error::new(
            ErrorKind::NotFound,
            format!("collection \"{}\" does not exist", name),
        )
    })
}

fn collection_mut<'a>(state: &'a mut EngineState, name: &str) -> Result<&'a mut CollectionState> {
    state.collections.get_mut(name).ok_or_else(|| {
        Error::new(
            ErrorKind::NotFound,
            format!("collection \"{}\" does not exist", name),
        )
    })
}

fn unindex(col: &mut CollectionState, key: &str, record: &Record) {
    for (field, idx) in col.indexes.iter_mut() {
        if let Some(index_key) = record.get(field).and_then(index_key) {
            if let Some(holders) = idx.entries.get_mut(&index_key) {
                holders.remove(key);
                if holders.is_empty() {
                    idx.entries.remove(&index_key);
                }
            }
        }
    }
}

// Only scalar values participate in indexes.
fn index_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Cursor over a snapshot of the keys taken when the cursor was opened.
/// Records are re-fetched by key on every step, so records deleted while
/// the scan is in flight are skipped rather than resurrected.
#[derive(Debug)]
pub struct MemoryCursor {
    state: Arc<RwLock<EngineState>>,
    collection: String,
    keys: VecDeque<String>,
}

impl RecordCursor for MemoryCursor {
    async fn next(&mut self) -> Result<Option<Record>> {
        while let Some(key) = self.keys.pop_front() {
            let state = self.state.read();
            let Some(col) = state.collections.get(&self.collection) else {
                return Ok(None);
            };
            if let Some(record) = col.records.get(&key) {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }
}

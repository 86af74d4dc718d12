use serde_json::Value;
use tracing::{debug, warn};

use crate::core::error::{ErrorKind, Result};
use crate::core::types::{Record, primary_key};
use crate::query::matcher;
use crate::query::predicate::Predicate;
use crate::storage::engine::{RecordCursor, StorageEngine};

/// Drives cursors over a collection: full scans with per-record predicate
/// evaluation (optionally deleting matches) and exact-match index lookups.
/// Stateless; every call owns its private result accumulator, so overlapping
/// scans on the same engine never race.
pub struct QueryEngine;

impl QueryEngine {
    /// Scan mode: ascending full cursor from the lowest primary key, every
    /// record checked against the compiled predicate list, matches collected
    /// in cursor order. An unregistered collection yields an empty result.
    pub async fn scan<E: StorageEngine>(
        engine: &E,
        collection: &str,
        predicates: &[Predicate],
    ) -> Result<Vec<Record>> {
        let compiled = matcher::compile(predicates)?;
        let Some(mut cursor) = open_scan(engine, collection).await? else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        while let Some(record) = cursor.next().await? {
            if matcher::matches(&record, &compiled) {
                results.push(record);
            }
        }
        debug!(collection, matched = results.len(), "scan complete");
        Ok(results)
    }

    /// Delete mode: same traversal as `scan`, but every match is deleted by
    /// primary key instead of collected. A failed delete is logged and the
    /// scan keeps going. Returns the number of records deleted.
    pub async fn scan_delete<E: StorageEngine>(
        engine: &E,
        collection: &str,
        predicates: &[Predicate],
    ) -> Result<usize> {
        let compiled = matcher::compile(predicates)?;
        let Some(mut cursor) = open_scan(engine, collection).await? else {
            return Ok(0);
        };

        let mut deleted = 0;
        while let Some(record) = cursor.next().await? {
            if !matcher::matches(&record, &compiled) {
                continue;
            }
            let Some(key) = primary_key(&record) else {
                continue;
            };
            match engine.delete(collection, key).await {
                Ok(()) => deleted += 1,
                Err(e) => warn!(collection, key, error = %e, "delete failed"),
            }
        }
        debug!(collection, deleted, "delete scan complete");
        Ok(deleted)
    }

    /// Index mode: exact-match cursor on a named secondary index; every hit
    /// is collected in primary-key order with no predicate evaluation.
    pub async fn by_index<E: StorageEngine>(
        engine: &E,
        collection: &str,
        index: &str,
        value: &Value,
    ) -> Result<Vec<Record>> {
        let mut cursor = match engine.exact_match(collection, index, value).await {
            Ok(cursor) => cursor,
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(collection, index, "index lookup on unknown target");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut results = Vec::new();
        while let Some(record) = cursor.next().await? {
            results.push(record);
        }
        Ok(results)
    }
}

async fn open_scan<E: StorageEngine>(
    engine: &E,
    collection: &str,
) -> Result<Option<E::Cursor>> {
    match engine.scan_ascending(collection).await {
        Ok(cursor) => Ok(Some(cursor)),
        Err(e) if e.kind == ErrorKind::NotFound => {
            warn!(collection, "scan on unknown collection");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

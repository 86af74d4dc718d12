use serde_json::Value;

use crate::core::error::Result;
use crate::core::types::Record;

/// One pass over a lazy sequence of records. Cursors are restartable per
/// call (open a new one), not mid-iteration.
#[allow(async_fn_in_trait)]
pub trait RecordCursor: Send {
    async fn next(&mut self) -> Result<Option<Record>>;
}

/// The storage engine contract the query layer depends on. Everything here
/// completes asynchronously; errors surface through the returned `Result`
/// and carry an engine-defined message the query layer only logs.
///
/// Required semantics:
/// - `open_collection` is idempotent for an already-open collection;
/// - `scan_ascending` visits records in ascending primary-key order;
/// - `exact_match` visits records whose indexed field equals the value, in
///   primary-key order;
/// - `put` replaces any record with the same primary key and fails on a
///   unique-index violation;
/// - `delete` succeeds whether or not the key exists.
#[allow(async_fn_in_trait)]
pub trait StorageEngine: Send + Sync {
    type Cursor: RecordCursor;

    async fn open_collection(&self, name: &str, primary_key_field: &str) -> Result<()>;

    async fn create_index(&self, collection: &str, field: &str, unique: bool) -> Result<()>;

    async fn scan_ascending(&self, collection: &str) -> Result<Self::Cursor>;

    async fn exact_match(&self, collection: &str, index: &str, value: &Value)
    -> Result<Self::Cursor>;

    async fn put(&self, collection: &str, record: Record) -> Result<()>;

    async fn delete(&self, collection: &str, primary_key: &str) -> Result<()>;

    /// Remove every collection and refuse further operations.
    async fn drop_all(&self) -> Result<()>;
}

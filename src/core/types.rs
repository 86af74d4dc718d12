use serde_json::{Map, Value};

/// System field holding the record's primary key. Assigned once, immutable.
pub const PRIMARY_KEY_FIELD: &str = "_id";

/// System field holding the derived search text. Recomputed on every write.
pub const SEARCH_TEXT_FIELD: &str = "_fts";

/// A record is an arbitrary document: field name to scalar, nested mapping
/// or sequence. Field insertion order is preserved (serde_json with
/// `preserve_order`), which fixes the search-text derivation order.
pub type Record = Map<String, Value>;

/// Primary key of a record, if present and string-typed.
pub fn primary_key(record: &Record) -> Option<&str> {
    record.get(PRIMARY_KEY_FIELD).and_then(Value::as_str)
}

/// Convert a JSON value into a record. Returns `None` for non-object values.
pub fn to_record(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

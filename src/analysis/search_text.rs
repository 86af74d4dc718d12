use serde_json::Value;

use crate::analysis::normalizer::normalize;
use crate::core::types::{PRIMARY_KEY_FIELD, Record, SEARCH_TEXT_FIELD};

// Documents deeper than this contribute nothing past the limit. JSON values
// are acyclic, so this only guards against pathological nesting.
const MAX_DEPTH: usize = 64;

/// Build the derived full-text field for a record: the space-joined sequence
/// of every flattened scalar leaf, in field insertion order, excluding the
/// primary key and any stale search text. String leaves are normalized,
/// other scalars are stringified as-is, nulls are skipped.
pub fn derive_search_text(record: &Record) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut stack: Vec<(&Value, usize)> = record
        .iter()
        .filter(|(name, _)| *name != PRIMARY_KEY_FIELD && *name != SEARCH_TEXT_FIELD)
        .map(|(_, value)| (value, 0))
        .rev()
        .collect();

    while let Some((value, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            continue;
        }
        match value {
            Value::Object(map) => {
                for (_, child) in map.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
            Value::Array(items) => {
                for child in items.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
            Value::String(s) => tokens.push(normalize(s)),
            Value::Number(n) => tokens.push(n.to_string()),
            Value::Bool(b) => tokens.push(b.to_string()),
            Value::Null => {}
        }
    }

    tokens.join(" ")
}

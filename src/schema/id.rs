use std::collections::HashMap;

/// Per-collection synthetic primary key allocator. Keys are `"c" + counter`
/// and the counter advances on every insert, even when the caller supplied
/// an explicit key, so allocated keys are never reused after deletes.
#[derive(Debug, Default)]
pub struct IdAllocator {
    counters: HashMap<String, u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            counters: HashMap::new(),
        }
    }

    /// Format the next key for `collection` and advance its counter.
    pub fn next_id(&mut self, collection: &str) -> String {
        let counter = self.counters.entry(collection.to_string()).or_insert(0);
        let id = format!("c{}", counter);
        *counter += 1;
        id
    }

    pub fn counter(&self, collection: &str) -> u64 {
        self.counters.get(collection).copied().unwrap_or(0)
    }
}

use serde::{Deserialize, Serialize};

/// Secondary index declaration on a single record field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    pub unique: bool,
}

/// A named collection with its ordered index declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    pub fn new(name: &str) -> Self {
        CollectionSpec {
            name: name.to_string(),
            indexes: Vec::new(),
        }
    }

    pub fn with_index(mut self, field: &str, unique: bool) -> Self {
        self.indexes.push(IndexSpec {
            field: field.to_string(),
            unique,
        });
        self
    }
}

/// The set of collections declared at construction time. The first declared
/// collection is the implicit default target for calls that omit a name.
/// Collections are never altered after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionRegistry {
    collections: Vec<CollectionSpec>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        CollectionRegistry {
            collections: Vec::new(),
        }
    }

    pub fn collection(mut self, spec: CollectionSpec) -> Self {
        self.collections.push(spec);
        self
    }

    pub fn default_collection(&self) -> Option<&str> {
        self.collections.first().map(|spec| spec.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.iter().any(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionSpec> {
        self.collections.iter()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

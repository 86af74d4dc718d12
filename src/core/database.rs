use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::analysis::search_text::derive_search_text;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{PRIMARY_KEY_FIELD, Record, SEARCH_TEXT_FIELD};
use crate::query::engine::QueryEngine;
use crate::query::predicate::Predicate;
use crate::schema::id::IdAllocator;
use crate::schema::registry::CollectionRegistry;
use crate::storage::engine::StorageEngine;

/// The caller-facing document store: named collections over a cursor-based
/// storage engine, with predicate queries, index lookups and delete-on-match.
///
/// A `Database` only exists once its storage has opened every declared
/// collection, so operations can never run against unopened storage. All
/// query methods take `&self` and keep per-call state only, making
/// overlapping calls safe.
#[derive(Debug)]
pub struct Database<E: StorageEngine> {
    config: Config,
    registry: CollectionRegistry,
    ids: Mutex<IdAllocator>,
    engine: E,
}

impl<E: StorageEngine> Database<E> {
    /// Open every declared collection and create its secondary indexes.
    /// Refuses an empty database name or an empty registry.
    pub async fn open(config: Config, registry: CollectionRegistry, engine: E) -> Result<Self> {
        if config.database_name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "database name missing".to_string(),
            ));
        }
        if registry.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "no collections declared".to_string(),
            ));
        }

        for spec in registry.iter() {
            engine.open_collection(&spec.name, PRIMARY_KEY_FIELD).await?;
            for index in &spec.indexes {
                engine
                    .create_index(&spec.name, &index.field, index.unique)
                    .await?;
            }
        }
        debug!(
            database = %config.database_name,
            collections = registry.len(),
            "database open"
        );

        Ok(Database {
            config,
            registry,
            ids: Mutex::new(IdAllocator::new()),
            engine,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The implicit target for calls that pass `None` as the collection.
    pub fn default_collection(&self) -> &str {
        // the registry was checked non-empty at open
        self.registry.default_collection().unwrap_or_default()
    }

    /// Insert (or fully replace) a record. A missing primary key gets the
    /// next synthetic key; the search text is recomputed either way. Returns
    /// the record's primary key.
    pub async fn insert(&self, collection: Option<&str>, mut record: Record) -> Result<String> {
        let name = self.resolve(collection);
        if !self.registry.contains(name) {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("collection \"{}\" not registered", name),
            ));
        }

        // The counter advances even when the caller supplied a key, so
        // synthetic keys are never reused within a collection.
        let candidate = self.ids.lock().next_id(name);
        let key = match record.get(PRIMARY_KEY_FIELD) {
            None | Some(Value::Null) => {
                record.insert(
                    PRIMARY_KEY_FIELD.to_string(),
                    Value::String(candidate.clone()),
                );
                candidate
            }
            Some(Value::String(existing)) => existing.clone(),
            Some(_) => {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    "primary key must be a string".to_string(),
                ));
            }
        };

        let search_text = derive_search_text(&record);
        record.insert(SEARCH_TEXT_FIELD.to_string(), Value::String(search_text));
        self.engine.put(name, record).await?;
        Ok(key)
    }

    /// Scan-and-filter: every record in ascending primary-key order, kept if
    /// it satisfies all predicates. Unknown collections yield no results.
    pub async fn query(
        &self,
        collection: Option<&str>,
        predicates: &[Predicate],
    ) -> Result<Vec<Record>> {
        QueryEngine::scan(&self.engine, self.resolve(collection), predicates).await
    }

    /// Every record of the collection, in ascending primary-key order.
    pub async fn query_all(&self, collection: Option<&str>) -> Result<Vec<Record>> {
        QueryEngine::scan(&self.engine, self.resolve(collection), &[]).await
    }

    /// Exact-match lookup on a declared secondary index, bypassing predicate
    /// evaluation.
    pub async fn query_by_index(
        &self,
        collection: Option<&str>,
        index: &str,
        value: &Value,
    ) -> Result<Vec<Record>> {
        QueryEngine::by_index(&self.engine, self.resolve(collection), index, value).await
    }

    /// Delete every record matching the predicates, in scan order. Returns
    /// how many records were deleted; their identities are not reported.
    pub async fn remove(
        &self,
        collection: Option<&str>,
        predicates: &[Predicate],
    ) -> Result<usize> {
        QueryEngine::scan_delete(&self.engine, self.resolve(collection), predicates).await
    }

    /// Empty every registered collection. Counters are not reset, so keys
    /// allocated afterwards keep increasing.
    pub async fn reset_all(&self) -> Result<()> {
        for spec in self.registry.iter() {
            QueryEngine::scan_delete(&self.engine, &spec.name, &[]).await?;
        }
        Ok(())
    }

    /// Drop the whole database. Consumes the handle; the storage engine
    /// refuses anything further.
    pub async fn drop_database(self) -> Result<()> {
        self.engine.drop_all().await
    }

    fn resolve<'a>(&'a self, collection: Option<&'a str>) -> &'a str {
        collection.unwrap_or_else(|| self.default_collection())
    }
}

pub mod analysis;
pub mod core;
pub mod query;
pub mod schema;
pub mod storage;

/*
┌──────────────────────────────────────────────────────────────────────┐
│                        QUARRYDB ARCHITECTURE                         │
└──────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── CORE LAYER ──────────────────────────────┐
│  struct Database<E: StorageEngine>                                   │
│    config: Config                    // database name, version       │
│    registry: CollectionRegistry      // declared collections/indexes │
│    ids: Mutex<IdAllocator>           // "c{n}" synthetic keys        │
│    engine: E                         // cursor-based KV storage      │
└──────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── QUERY LAYER ─────────────────────────────┐
│  QueryEngine        // scan / delete-on-match / index lookup         │
│  CompiledPredicate  // per-type comparison, built once per query     │
│  Predicate          // field + kind + content + compare op           │
└──────────────────────────────────────────────────────────────────────┘

┌─────────────────────────── ANALYSIS LAYER ───────────────────────────┐
│  normalizer     // case fold + percent decode + diacritic flatten    │
│  search_text    // derived "_fts" field from all scalar leaves       │
└──────────────────────────────────────────────────────────────────────┘

┌─────────────────────────── STORAGE LAYER ────────────────────────────┐
│  trait StorageEngine / trait RecordCursor   // host engine contract  │
│  MemoryEngine                               // in-memory reference   │
└──────────────────────────────────────────────────────────────────────┘

Control flow: the registry defines the schema, inserts stamp a key and
recompute the search text, queries drive an ascending cursor and apply
the predicate list per record, deletes ride the same scan.
*/

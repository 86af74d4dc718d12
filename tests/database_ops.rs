use quarrydb::core::config::Config;
use quarrydb::core::database::Database;
use quarrydb::core::error::ErrorKind;
use quarrydb::core::types::{PRIMARY_KEY_FIELD, Record, SEARCH_TEXT_FIELD, to_record};
use quarrydb::query::predicate::{CompareOp, Predicate};
use quarrydb::schema::registry::{CollectionRegistry, CollectionSpec};
use quarrydb::storage::engine::StorageEngine;
use quarrydb::storage::memory::MemoryEngine;
use serde_json::json;

fn library_registry() -> CollectionRegistry {
    CollectionRegistry::new()
        .collection(
            CollectionSpec::new("books")
                .with_index("isbn", true)
                .with_index("author", false),
        )
        .collection(CollectionSpec::new("members"))
}

async fn library() -> Database<MemoryEngine> {
    Database::open(Config::new("library"), library_registry(), MemoryEngine::new())
        .await
        .unwrap()
}

fn rec(value: serde_json::Value) -> Record {
    to_record(value).unwrap()
}

fn titles(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn open_rejects_missing_configuration() {
    let err = Database::open(Config::new(""), library_registry(), MemoryEngine::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let err = Database::open(
        Config::new("library"),
        CollectionRegistry::new(),
        MemoryEngine::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn insert_assigns_sequential_keys_and_search_text() {
    let db = library().await;
    let k1 = db
        .insert(Some("books"), rec(json!({"title": "The Hobbit", "isbn": "h1"})))
        .await
        .unwrap();
    let k2 = db
        .insert(Some("books"), rec(json!({"title": "The Hobbes", "isbn": "h2"})))
        .await
        .unwrap();
    assert_eq!(k1, "c0");
    assert_eq!(k2, "c1");

    let all = db.query_all(Some("books")).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0][SEARCH_TEXT_FIELD].as_str(), Some("the hobbit h1"));
}

#[tokio::test]
async fn keys_stay_unique_across_deletes() {
    let db = library().await;
    for i in 0..3 {
        db.insert(Some("books"), rec(json!({"title": format!("b{i}")})))
            .await
            .unwrap();
    }
    let removed = db.remove(Some("books"), &[]).await.unwrap();
    assert_eq!(removed, 3);

    let key = db
        .insert(Some("books"), rec(json!({"title": "b3"})))
        .await
        .unwrap();
    assert_eq!(key, "c3");
}

#[tokio::test]
async fn counter_advances_even_for_explicit_keys() {
    let db = library().await;
    let key = db
        .insert(
            Some("books"),
            rec(json!({"_id": "mine", "title": "Custom"})),
        )
        .await
        .unwrap();
    assert_eq!(key, "mine");

    // the slot consumed by the explicit-key insert is skipped
    let key = db
        .insert(Some("books"), rec(json!({"title": "Next"})))
        .await
        .unwrap();
    assert_eq!(key, "c1");
}

#[tokio::test]
async fn insert_rejects_non_string_primary_keys() {
    let db = library().await;
    let err = db
        .insert(Some("books"), rec(json!({"_id": 9, "title": "Bad"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn books_contains_and_equals_scenario() {
    let db = library().await;
    db.insert(Some("books"), rec(json!({"title": "The Hobbit", "isbn": "h1"})))
        .await
        .unwrap();
    db.insert(Some("books"), rec(json!({"title": "The Hobbes", "isbn": "h2"})))
        .await
        .unwrap();

    let both = db
        .query(Some("books"), &[Predicate::new("title", "hobb")])
        .await
        .unwrap();
    assert_eq!(titles(&both), ["The Hobbit", "The Hobbes"]);

    let one = db
        .query(
            Some("books"),
            &[Predicate::string("title", CompareOp::Equals, "the hobbit")],
        )
        .await
        .unwrap();
    assert_eq!(titles(&one), ["The Hobbit"]);
}

#[tokio::test]
async fn number_predicates_filter_ranges() {
    let db = library().await;
    db.insert(Some("members"), rec(json!({"name": "Ada", "age": 25})))
        .await
        .unwrap();
    db.insert(Some("members"), rec(json!({"name": "Grace", "age": 35})))
        .await
        .unwrap();

    let adults = db
        .query(
            Some("members"),
            &[Predicate::number("age", CompareOp::Gte, "30")],
        )
        .await
        .unwrap();
    assert_eq!(adults.len(), 1);
    assert_eq!(adults[0]["name"].as_str(), Some("Grace"));
}

#[tokio::test]
async fn fulltext_searches_the_whole_record() {
    let db = library().await;
    db.insert(
        Some("books"),
        rec(json!({"title": "Catalogue", "notes": {"color": "Red", "kind": "car"}})),
    )
    .await
    .unwrap();
    db.insert(
        Some("books"),
        rec(json!({"title": "Only red things", "notes": "red"})),
    )
    .await
    .unwrap();

    let hits = db
        .query(Some("books"), &[Predicate::fulltext("red car")])
        .await
        .unwrap();
    assert_eq!(titles(&hits), ["Catalogue"]);
}

#[tokio::test]
async fn remove_deletes_only_matches() {
    let db = library().await;
    for (title, year) in [("R1", 1990), ("R2", 1991), ("R3", 2005)] {
        db.insert(Some("books"), rec(json!({"title": title, "year": year})))
            .await
            .unwrap();
    }
    let removed = db
        .remove(
            Some("books"),
            &[Predicate::number("year", CompareOp::Lt, "2000")],
        )
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let left = db.query_all(Some("books")).await.unwrap();
    assert_eq!(titles(&left), ["R3"]);
}

#[tokio::test]
async fn query_by_index_unique_and_non_unique() {
    let db = library().await;
    db.insert(
        Some("books"),
        rec(json!({"title": "A", "isbn": "i-a", "author": "tolkien"})),
    )
    .await
    .unwrap();
    db.insert(
        Some("books"),
        rec(json!({"title": "B", "isbn": "i-b", "author": "tolkien"})),
    )
    .await
    .unwrap();

    let by_isbn = db
        .query_by_index(Some("books"), "isbn", &json!("i-a"))
        .await
        .unwrap();
    assert_eq!(titles(&by_isbn), ["A"]);

    let by_author = db
        .query_by_index(Some("books"), "author", &json!("tolkien"))
        .await
        .unwrap();
    assert_eq!(titles(&by_author), ["A", "B"]);

    let none = db
        .query_by_index(Some("books"), "author", &json!("nobody"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn unique_index_violation_surfaces_as_storage_error() {
    let db = library().await;
    db.insert(Some("books"), rec(json!({"title": "A", "isbn": "same"})))
        .await
        .unwrap();
    let err = db
        .insert(Some("books"), rec(json!({"title": "B", "isbn": "same"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Storage);
}

#[tokio::test]
async fn unknown_collection_yields_empty_results_not_errors() {
    let db = library().await;
    assert!(db.query_all(Some("missing")).await.unwrap().is_empty());
    assert!(
        db.query(Some("missing"), &[Predicate::new("x", "y")])
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(db.remove(Some("missing"), &[]).await.unwrap(), 0);

    // inserts cannot silently succeed against nothing
    let err = db
        .insert(Some("missing"), rec(json!({"title": "x"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn omitted_collection_targets_the_first_declared() {
    let db = library().await;
    assert_eq!(db.default_collection(), "books");
    db.insert(None, rec(json!({"title": "Default", "isbn": "d"})))
        .await
        .unwrap();
    let all = db.query_all(None).await.unwrap();
    assert_eq!(titles(&all), ["Default"]);
    assert!(db.query_all(Some("members")).await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_all_empties_every_collection_but_keeps_counters() {
    let db = library().await;
    db.insert(Some("books"), rec(json!({"title": "A", "isbn": "a"})))
        .await
        .unwrap();
    db.insert(Some("members"), rec(json!({"name": "Ada"})))
        .await
        .unwrap();

    db.reset_all().await.unwrap();
    assert!(db.query_all(Some("books")).await.unwrap().is_empty());
    assert!(db.query_all(Some("members")).await.unwrap().is_empty());

    let key = db
        .insert(Some("books"), rec(json!({"title": "B", "isbn": "b"})))
        .await
        .unwrap();
    assert_eq!(key, "c1");
}

#[tokio::test]
async fn drop_database_closes_the_storage() {
    let engine = MemoryEngine::new();
    let db = Database::open(Config::new("library"), library_registry(), engine.clone())
        .await
        .unwrap();
    db.drop_database().await.unwrap();

    let err = engine.scan_ascending("books").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test]
async fn replacing_a_record_recomputes_search_text() {
    let db = library().await;
    let key = db
        .insert(Some("books"), rec(json!({"title": "Old Title", "isbn": "x"})))
        .await
        .unwrap();

    // full re-put under the same key, stale search text included
    db.insert(
        Some("books"),
        rec(json!({"_id": key, "title": "New Title", "isbn": "x", "_fts": "old title x"})),
    )
    .await
    .unwrap();

    let all = db.query_all(Some("books")).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0][SEARCH_TEXT_FIELD].as_str(), Some("new title x"));

    let hits = db
        .query(Some("books"), &[Predicate::fulltext("old")])
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn overlapping_scans_do_not_interfere() {
    let db = std::sync::Arc::new(library().await);
    for i in 0..50 {
        db.insert(Some("books"), rec(json!({"title": format!("book {i}")})))
            .await
            .unwrap();
    }
    let a = {
        let db = db.clone();
        tokio::spawn(async move { db.query_all(Some("books")).await })
    };
    let b = {
        let db = db.clone();
        tokio::spawn(async move { db.query_all(Some("books")).await })
    };
    assert_eq!(a.await.unwrap().unwrap().len(), 50);
    assert_eq!(b.await.unwrap().unwrap().len(), 50);
}

#[tokio::test]
async fn records_keep_primary_key_field() {
    let db = library().await;
    db.insert(Some("books"), rec(json!({"title": "A", "isbn": "a"})))
        .await
        .unwrap();
    let all = db.query_all(Some("books")).await.unwrap();
    assert_eq!(all[0][PRIMARY_KEY_FIELD].as_str(), Some("c0"));
}

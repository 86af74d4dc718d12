/// Complete quarrydb API demo
///
/// Demonstrates the major operations:
/// - schema declaration (collections + secondary indexes)
/// - insert with synthetic and explicit keys
/// - predicate queries (string / number / fulltext)
/// - index lookups
/// - delete-on-match and reset
use quarrydb::core::config::Config;
use quarrydb::core::database::Database;
use quarrydb::core::types::to_record;
use quarrydb::query::predicate::{CompareOp, Predicate};
use quarrydb::schema::registry::{CollectionRegistry, CollectionSpec};
use quarrydb::storage::memory::MemoryEngine;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: declare the schema and open the database
    let registry = CollectionRegistry::new()
        .collection(
            CollectionSpec::new("books")
                .with_index("isbn", true)
                .with_index("author", false),
        )
        .collection(CollectionSpec::new("members"));
    let db = Database::open(Config::new("library"), registry, MemoryEngine::new()).await?;
    println!("Opened database \"{}\"", db.config().database_name);

    // Step 2: INSERT
    let k1 = db
        .insert(
            Some("books"),
            to_record(json!({
                "title": "The Hobbit",
                "author": "J.R.R. Tolkien",
                "isbn": "978-0", "year": 1937,
                "tags": ["fantasy", "classic"],
            }))
            .unwrap(),
        )
        .await?;
    let k2 = db
        .insert(
            Some("books"),
            to_record(json!({
                "title": "Leviathan",
                "author": "Thomas Hobbes",
                "isbn": "978-1", "year": 1651,
            }))
            .unwrap(),
        )
        .await?;
    println!("Inserted books with keys {k1} and {k2}");

    // Step 3: QUERY
    let hits = db
        .query(Some("books"), &[Predicate::new("title", "hobb")])
        .await?;
    println!("'title contains hobb': {} result(s)", hits.len());

    let hits = db
        .query(
            Some("books"),
            &[Predicate::number("year", CompareOp::Gte, "1900")],
        )
        .await?;
    println!("'year >= 1900': {} result(s)", hits.len());

    let hits = db
        .query(Some("books"), &[Predicate::fulltext("tolkien fantasy")])
        .await?;
    println!("fulltext 'tolkien fantasy': {} result(s)", hits.len());

    // Step 4: index lookup
    let hits = db
        .query_by_index(Some("books"), "isbn", &json!("978-1"))
        .await?;
    println!("isbn 978-1: {:?}", hits[0]["title"]);

    // Step 5: DELETE
    let removed = db
        .remove(
            Some("books"),
            &[Predicate::number("year", CompareOp::Lt, "1900")],
        )
        .await?;
    println!("Removed {removed} pre-1900 book(s)");
    println!(
        "Remaining: {} book(s)",
        db.query_all(Some("books")).await?.len()
    );

    // Step 6: reset and drop
    db.reset_all().await?;
    db.drop_database().await?;
    println!("Database dropped");

    Ok(())
}

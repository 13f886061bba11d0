use std::env;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:money_transfer.db";

/// Errors surfaced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// DocumentStore manages JSON document collections backed by SQLite.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct DocumentStore {
    pool: Arc<SqlitePool>,
}

impl DocumentStore {
    /// Create a new store connection
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database, honoring a DATABASE_URL override
    pub async fn init() -> Result<Self, StoreError> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self, StoreError> {
        // Generate a unique database name for tests
        let test_id = Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        // Every record lives in one table, keyed by collection name and id
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                doc TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Typed handle onto one named collection.
    pub fn collection<T>(&self, name: &'static str) -> Collection<T> {
        Collection {
            pool: Arc::clone(&self.pool),
            name,
            _record: PhantomData,
        }
    }

    /// True only for the store's native identifier format: exactly
    /// 32 lowercase hexadecimal characters.
    pub fn is_valid_id(raw: &str) -> bool {
        raw.len() == 32 && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

/// Fresh store-native identifier.
fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A typed handle onto one document collection.
///
/// Records must serialize to a JSON object carrying an `id` field; the
/// store owns that field and assigns it at creation time.
pub struct Collection<T> {
    pool: Arc<SqlitePool>,
    name: &'static str,
    _record: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Persist a new document under a fresh identifier, overwriting
    /// whatever the caller left in the `id` field. Returns the record
    /// as stored.
    pub async fn create(&self, record: &T) -> Result<T, StoreError> {
        let id = new_id();
        let mut doc = serde_json::to_value(record)?;
        if let Some(fields) = doc.as_object_mut() {
            fields.insert("id".to_string(), Value::String(id.clone()));
        }

        sqlx::query("INSERT INTO documents (collection, id, doc) VALUES (?, ?, ?)")
            .bind(self.name)
            .bind(&id)
            .bind(doc.to_string())
            .execute(&*self.pool)
            .await?;

        Ok(serde_json::from_value(doc)?)
    }

    /// All documents in the collection, in insertion order.
    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM documents WHERE collection = ? ORDER BY rowid")
            .bind(self.name)
            .fetch_all(&*self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let doc: String = row.get("doc");
            records.push(serde_json::from_str(&doc)?);
        }
        Ok(records)
    }

    /// Retrieve a document by its identifier
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let row = sqlx::query("SELECT doc FROM documents WHERE collection = ? AND id = ?")
            .bind(self.name)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some(r) => {
                let doc: String = r.get("doc");
                Ok(Some(serde_json::from_str(&doc)?))
            }
            None => Ok(None),
        }
    }

    /// Merge `changes` into the stored document and return the result.
    ///
    /// Top-level fields replace their stored counterparts; the `id`
    /// field is never merged. The read-merge-write runs in a single
    /// transaction so each update is atomic per document. Returns
    /// `None` when no document matches.
    pub async fn update_by_id(
        &self,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<Option<T>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT doc FROM documents WHERE collection = ? AND id = ?")
            .bind(self.name)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored: String = row.get("doc");
        let mut doc: Value = serde_json::from_str(&stored)?;
        if let Some(fields) = doc.as_object_mut() {
            for (key, value) in changes {
                if key != "id" {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }

        sqlx::query("UPDATE documents SET doc = ? WHERE collection = ? AND id = ?")
            .bind(doc.to_string())
            .bind(self.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(serde_json::from_value(doc)?))
    }

    /// Delete a document by its identifier.
    /// Returns false when no document with that id existed.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(self.name)
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Map, Value};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        label: String,
        amount: f64,
    }

    fn record(label: &str, amount: f64) -> Record {
        Record {
            id: String::new(),
            label: label.to_string(),
            amount,
        }
    }

    // Setup a new test store for each test
    async fn setup_test() -> DocumentStore {
        DocumentStore::init_test()
            .await
            .expect("Failed to create test store")
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_roundtrips() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let created = records
            .create(&record("first", 10.0))
            .await
            .expect("Failed to create record");

        assert!(DocumentStore::is_valid_id(&created.id));
        assert_eq!(created.label, "first");

        let found = records
            .find_by_id(&created.id)
            .await
            .expect("Failed to fetch record");
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_by_unknown_id() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let found = records
            .find_by_id("0123456789abcdef0123456789abcdef")
            .await
            .expect("Query failed");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let empty = records.find_all().await.expect("Failed to list records");
        assert!(empty.is_empty(), "Store should be empty at test start");

        for label in ["a", "b", "c"] {
            records
                .create(&record(label, 1.0))
                .await
                .expect("Failed to create record");
        }

        let all = records.find_all().await.expect("Failed to list records");
        let labels: Vec<&str> = all.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let created = records
            .create(&record("before", 5.0))
            .await
            .expect("Failed to create record");

        let mut changes = Map::new();
        changes.insert("label".to_string(), json!("after"));

        let updated = records
            .update_by_id(&created.id, &changes)
            .await
            .expect("Failed to update record")
            .expect("Record should exist");

        assert_eq!(updated.label, "after");
        // Untouched fields survive the merge
        assert_eq!(updated.amount, 5.0);
        assert_eq!(updated.id, created.id);
    }

    #[tokio::test]
    async fn test_update_never_overwrites_id() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let created = records
            .create(&record("fixed", 1.0))
            .await
            .expect("Failed to create record");

        let mut changes = Map::new();
        changes.insert("id".to_string(), json!("ffffffffffffffffffffffffffffffff"));
        changes.insert("label".to_string(), json!("renamed"));

        let updated = records
            .update_by_id(&created.id, &changes)
            .await
            .expect("Failed to update record")
            .expect("Record should exist");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.label, "renamed");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let changes: Map<String, Value> = Map::new();
        let updated = records
            .update_by_id("0123456789abcdef0123456789abcdef", &changes)
            .await
            .expect("Failed to run update");

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent_success() {
        let store = setup_test().await;
        let records = store.collection::<Record>("records");

        let created = records
            .create(&record("doomed", 1.0))
            .await
            .expect("Failed to create record");

        let deleted = records
            .delete_by_id(&created.id)
            .await
            .expect("Failed to delete record");
        assert!(deleted, "Record should have been deleted");

        let gone = records
            .find_by_id(&created.id)
            .await
            .expect("Failed to fetch record");
        assert!(gone.is_none());

        // Second delete of the same id is a miss, not a success
        let deleted_again = records
            .delete_by_id(&created.id)
            .await
            .expect("Failed to re-delete record");
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = setup_test().await;
        let first = store.collection::<Record>("first");
        let second = store.collection::<Record>("second");

        first
            .create(&record("only-in-first", 1.0))
            .await
            .expect("Failed to create record");

        let others = second.find_all().await.expect("Failed to list records");
        assert!(others.is_empty());
    }

    #[test]
    fn test_is_valid_id() {
        assert!(DocumentStore::is_valid_id(&new_id()));
        assert!(DocumentStore::is_valid_id(
            "0123456789abcdef0123456789abcdef"
        ));

        assert!(!DocumentStore::is_valid_id("invalid"));
        assert!(!DocumentStore::is_valid_id(""));
        // Right length, wrong alphabet
        assert!(!DocumentStore::is_valid_id(
            "0123456789ABCDEF0123456789ABCDEF"
        ));
        assert!(!DocumentStore::is_valid_id(
            "0123456789abcdef0123456789abcdeg"
        ));
        // Wrong length
        assert!(!DocumentStore::is_valid_id("0123456789abcdef"));
    }
}

//! MongoDB-backed gifts collection.
//!
//! The client is created on first use and shared by every later call, so the
//! connection provider can be awaited from each request handler.

use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::filter::GiftQuery;
use crate::lookup::Lookup;
use crate::store::{value_kind, GiftStore, StoreError};
use crate::types::{Gift, FIELD_AGE_YEARS, FIELD_CATEGORY, FIELD_CONDITION, FIELD_NAME};

pub struct MongoStore {
    uri: String,
    database: String,
    collection_name: String,
    collection: OnceCell<Collection<Document>>,
}

impl MongoStore {
    pub fn new(uri: &str, database: &str, collection: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
            collection_name: collection.to_string(),
            collection: OnceCell::new(),
        }
    }

    /// Handle to the gifts collection, connecting on first call.
    ///
    /// A failed connection is not cached; the next call tries again.
    pub async fn collection(&self) -> Result<&Collection<Document>, StoreError> {
        self.collection
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.uri)
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
                let db = client.database(&self.database);
                db.run_command(doc! { "ping": 1 })
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
                info!(
                    database = self.database.as_str(),
                    collection = self.collection_name.as_str(),
                    "Connected to MongoDB"
                );
                Ok(db.collection::<Document>(&self.collection_name))
            })
            .await
    }
}

// ---------------------------------------------------------------------------
// BSON <-> JSON
// ---------------------------------------------------------------------------

/// Convert a stored document to JSON, rendering object ids as plain hex strings.
pub fn document_to_gift(document: Document) -> Gift {
    match bson_to_json(Bson::Document(document)) {
        Value::Object(fields) => Gift::new(fields),
        _ => Gift::default(),
    }
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => {
            Value::Object(doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect())
        }
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

fn json_to_document(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(fields) => {
            bson::to_document(&fields).map_err(|e| StoreError::Backend(e.to_string()))
        }
        other => Err(StoreError::InvalidDocument(value_kind(&other))),
    }
}

fn lookup_filter(lookup: &Lookup) -> Document {
    match lookup {
        Lookup::StringId(s) => doc! { "id": s.as_str() },
        Lookup::NumericId(n) => doc! { "id": *n },
        Lookup::NativeId(oid) => doc! { "_id": *oid },
    }
}

/// Translate a search query into a MongoDB filter document.
pub fn search_filter(query: &GiftQuery) -> Document {
    let mut filter = Document::new();
    if let Some(pattern) = query.name_pattern() {
        filter.insert(FIELD_NAME, doc! { "$regex": pattern, "$options": "i" });
    }
    if let Some(category) = query.category_term() {
        filter.insert(FIELD_CATEGORY, category);
    }
    if let Some(condition) = query.condition_term() {
        filter.insert(FIELD_CONDITION, condition);
    }
    if let Some(age) = query.age_years {
        filter.insert(FIELD_AGE_YEARS, doc! { "$lte": i64::from(age) });
    }
    filter
}

#[async_trait]
impl GiftStore for MongoStore {
    async fn all(&self) -> Result<Vec<Gift>, StoreError> {
        let cursor = self.collection().await?.find(doc! {}).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(document_to_gift).collect())
    }

    async fn find_one(&self, lookup: &Lookup) -> Result<Option<Gift>, StoreError> {
        let filter = lookup_filter(lookup);
        debug!(tier = lookup.tier(), filter = %filter, "find_one");
        let found = self.collection().await?.find_one(filter).await?;
        Ok(found.map(document_to_gift))
    }

    async fn insert(&self, document: Value) -> Result<Value, StoreError> {
        let document = json_to_document(document)?;
        let result = self.collection().await?.insert_one(document).await?;
        Ok(bson_to_json(result.inserted_id))
    }

    async fn search(&self, query: &GiftQuery) -> Result<Vec<Gift>, StoreError> {
        let filter = search_filter(query);
        debug!(filter = %filter, "search");
        let cursor = self.collection().await?.find(filter).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(document_to_gift).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection().await?.count_documents(doc! {}).await?)
    }

    fn name(&self) -> &'static str {
        "mongodb"
    }
}

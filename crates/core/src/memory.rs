use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;

use crate::filter::GiftQuery;
use crate::lookup::Lookup;
use crate::store::{value_kind, GiftStore, StoreError};
use crate::types::{new_native_id, Gift, FIELD_ID, FIELD_NATIVE_ID};

/// In-process gifts collection, used for development (`--memory`) and tests.
///
/// Native ids are kept as 24-char hex strings, the same shape the MongoDB backend
/// returns them in.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Gift>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from JSON documents. Non-object values are skipped; missing `_id`s are assigned.
    pub fn from_documents(documents: impl IntoIterator<Item = Value>) -> Self {
        let docs = documents
            .into_iter()
            .filter_map(|doc| match doc {
                Value::Object(mut fields) => {
                    fields.entry(FIELD_NATIVE_ID).or_insert_with(new_native_id);
                    Some(Gift::new(fields))
                }
                _ => None,
            })
            .collect();
        Self { docs: RwLock::new(docs) }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Gift>>, StoreError> {
        self.docs.read().map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

fn matches_lookup(gift: &Gift, lookup: &Lookup) -> bool {
    match lookup {
        Lookup::StringId(s) => gift.get(FIELD_ID).and_then(Value::as_str) == Some(s.as_str()),
        Lookup::NumericId(n) => match gift.get(FIELD_ID) {
            Some(Value::Number(stored)) => numeric_id_eq(stored, *n),
            _ => false,
        },
        Lookup::NativeId(oid) => match gift.get(FIELD_NATIVE_ID) {
            Some(Value::String(hex)) => hex.eq_ignore_ascii_case(&oid.to_hex()),
            Some(Value::Object(obj)) => {
                obj.get("$oid").and_then(Value::as_str) == Some(oid.to_hex().as_str())
            }
            _ => false,
        },
    }
}

/// Integers compare exactly; a stored float matches only when it is exactly `n`, e.g. 875.0.
fn numeric_id_eq(stored: &serde_json::Number, n: i64) -> bool {
    if let Some(v) = stored.as_i64() {
        return v == n;
    }
    if stored.is_u64() {
        return false;
    }
    stored.as_f64().is_some_and(|v| v == n as f64 && v as i64 == n)
}

#[async_trait]
impl GiftStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Gift>, StoreError> {
        Ok(self.read()?.clone())
    }

    async fn find_one(&self, lookup: &Lookup) -> Result<Option<Gift>, StoreError> {
        Ok(self.read()?.iter().find(|g| matches_lookup(g, lookup)).cloned())
    }

    async fn insert(&self, document: Value) -> Result<Value, StoreError> {
        let mut fields = match document {
            Value::Object(fields) => fields,
            other => return Err(StoreError::InvalidDocument(value_kind(&other))),
        };
        let id = fields.entry(FIELD_NATIVE_ID).or_insert_with(new_native_id).clone();
        self.docs
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))?
            .push(Gift::new(fields));
        Ok(id)
    }

    async fn search(&self, query: &GiftQuery) -> Result<Vec<Gift>, StoreError> {
        let matcher = query.matcher();
        Ok(self.read()?.iter().filter(|g| matcher.matches(g)).cloned().collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_native_id() {
        let store = MemoryStore::new();
        let id = store.insert(json!({ "name": "Lamp" })).await.unwrap();
        let hex = id.as_str().unwrap();
        assert_eq!(hex.len(), 24);

        let oid = bson::oid::ObjectId::parse_str(hex).unwrap();
        let found = store.find_one(&Lookup::NativeId(oid)).await.unwrap().unwrap();
        assert_eq!(found.summary().name.as_deref(), Some("Lamp"));
    }

    #[tokio::test]
    async fn insert_keeps_caller_id() {
        let store = MemoryStore::new();
        let id = store.insert(json!({ "_id": "custom", "name": "Lamp" })).await.unwrap();
        assert_eq!(id, json!("custom"));
    }

    #[tokio::test]
    async fn insert_rejects_non_objects() {
        let store = MemoryStore::new();
        let err = store.insert(json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument("an array")));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn numeric_lookup_matches_float_representation() {
        let store = MemoryStore::from_documents(vec![json!({ "id": 7.0 })]);
        assert!(store.find_one(&Lookup::NumericId(7)).await.unwrap().is_some());
        assert!(store.find_one(&Lookup::StringId("7".into())).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn numeric_lookup_is_exact_for_large_ids() {
        let store = MemoryStore::from_documents(vec![
            json!({ "id": 9007199254740993_i64, "name": "A" }),
            json!({ "id": 9007199254740992_i64, "name": "B" }),
        ]);
        let found = store.find_one(&Lookup::NumericId(9007199254740992)).await.unwrap().unwrap();
        assert_eq!(found.summary().name.as_deref(), Some("B"));

        let store = MemoryStore::from_documents(vec![json!({ "id": 9007199254740993_i64 })]);
        assert!(store.find_one(&Lookup::NumericId(9007199254740992)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn all_preserves_insertion_order() {
        let store = MemoryStore::from_documents(vec![
            json!({ "name": "a" }),
            json!({ "name": "b" }),
            json!("skipped"),
        ]);
        let names: Vec<_> =
            store.all().await.unwrap().iter().filter_map(|g| g.summary().name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn search_combines_filters() {
        let store = MemoryStore::from_documents(vec![
            json!({ "name": "Kettle", "category": "Kitchen", "age_years": 2 }),
            json!({ "name": "Toaster", "category": "Kitchen", "age_years": 8 }),
            json!({ "name": "Desk", "category": "Office", "age_years": 1 }),
        ]);
        let query = GiftQuery {
            category: Some("Kitchen".into()),
            age_years: Some(5),
            ..Default::default()
        };
        let found = store.search(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].summary().name.as_deref(), Some("Kettle"));

        assert_eq!(store.search(&GiftQuery::default()).await.unwrap().len(), 3);
    }
}

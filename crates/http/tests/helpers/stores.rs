//! Store doubles for exercising specific handler paths.

use async_trait::async_trait;
use giftlink_core::{Gift, GiftQuery, GiftStore, Lookup, MemoryStore, StoreError};
use serde_json::Value;
use std::sync::Mutex;

/// Every call fails as if the database were unreachable.
pub struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Connection("connection refused".to_string())
}

#[async_trait]
impl GiftStore for UnreachableStore {
    async fn all(&self) -> Result<Vec<Gift>, StoreError> {
        Err(unreachable())
    }

    async fn find_one(&self, _lookup: &Lookup) -> Result<Option<Gift>, StoreError> {
        Err(unreachable())
    }

    async fn insert(&self, _document: Value) -> Result<Value, StoreError> {
        Err(unreachable())
    }

    async fn search(&self, _query: &GiftQuery) -> Result<Vec<Gift>, StoreError> {
        Err(unreachable())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Err(unreachable())
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

/// Memory store that records every lookup it is asked to run.
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub lookups: Mutex<Vec<Lookup>>,
}

impl RecordingStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { inner: MemoryStore::from_documents(documents), lookups: Mutex::new(Vec::new()) }
    }

    pub fn tiers(&self) -> Vec<&'static str> {
        self.lookups.lock().unwrap().iter().map(Lookup::tier).collect()
    }
}

#[async_trait]
impl GiftStore for RecordingStore {
    async fn all(&self) -> Result<Vec<Gift>, StoreError> {
        self.inner.all().await
    }

    async fn find_one(&self, lookup: &Lookup) -> Result<Option<Gift>, StoreError> {
        self.lookups.lock().unwrap().push(lookup.clone());
        self.inner.find_one(lookup).await
    }

    async fn insert(&self, document: Value) -> Result<Value, StoreError> {
        self.inner.insert(document).await
    }

    async fn search(&self, query: &GiftQuery) -> Result<Vec<Gift>, StoreError> {
        self.inner.search(query).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

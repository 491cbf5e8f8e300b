//! GiftLink listing service.
//!
//! Library half of the `giftlink` binary: store construction, seed and import
//! files, and assembling the router with its HTTP layers. The route handlers
//! themselves live in [`giftlink_http`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use serde_json::Value;
use thiserror::Error;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use giftlink_core::{GiftStore, GiftlinkConfig, MemoryStore, StoreError};
use giftlink_http::{router, AppContext};

// ---------------------------------------------------------------------------
// Cross-platform path helpers
// ---------------------------------------------------------------------------

/// Platform-aware home directory: `HOME` on Unix, `USERPROFILE` on Windows.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok().map(PathBuf::from)
}

/// Platform-aware config directory: `~/.giftlink` on Unix, `%APPDATA%/giftlink` on Windows.
pub fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("APPDATA").ok().map(|a| PathBuf::from(a).join("giftlink"))
    } else {
        home_dir().map(|h| h.join(".giftlink"))
    }
}

// ---------------------------------------------------------------------------
// Store construction
// ---------------------------------------------------------------------------

/// Build the gift store: in-memory when `memory` is set, MongoDB otherwise.
///
/// Without the `mongo` feature the memory store is always used.
pub fn build_store(config: &GiftlinkConfig, memory: bool) -> Arc<dyn GiftStore> {
    if memory {
        info!("Using in-memory store");
        return Arc::new(MemoryStore::new());
    }

    #[cfg(feature = "mongo")]
    {
        info!(
            database = config.database.as_str(),
            collection = config.collection.as_str(),
            "Using MongoDB store"
        );
        Arc::new(giftlink_core::MongoStore::new(
            &config.mongo_uri,
            &config.database,
            &config.collection,
        ))
    }

    #[cfg(not(feature = "mongo"))]
    {
        let _ = config;
        warn!("Built without MongoDB support, falling back to in-memory store");
        Arc::new(MemoryStore::new())
    }
}

// ---------------------------------------------------------------------------
// Seed / import files
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} must contain a JSON array of gift objects")]
    NotAnArray { path: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read a JSON array of gift records from `path`.
pub fn load_seed_file(path: &Path) -> Result<Vec<Value>, SeedError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|source| SeedError::Read { path: display.clone(), source })?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|source| SeedError::Parse { path: display.clone(), source })?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(SeedError::NotAnArray { path: display }),
    }
}

/// Insert every object in `documents`. Non-objects are skipped with a warning.
/// Returns how many were inserted.
pub async fn import(store: &dyn GiftStore, documents: Vec<Value>) -> Result<usize, SeedError> {
    let mut inserted = 0;
    for (index, document) in documents.into_iter().enumerate() {
        if !document.is_object() {
            warn!(index = index, "Skipping non-object record");
            continue;
        }
        store.insert(document).await?;
        inserted += 1;
    }
    debug!(inserted = inserted, store = store.name(), "Import finished");
    Ok(inserted)
}

/// Import `documents` only when the store holds no gifts yet. Returns how many were inserted.
pub async fn seed_if_empty(store: &dyn GiftStore, documents: Vec<Value>) -> Result<usize, SeedError> {
    let existing = store.count().await?;
    if existing > 0 {
        info!(existing = existing, "Store already populated, skipping seed");
        return Ok(0);
    }
    import(store, documents).await
}

// ---------------------------------------------------------------------------
// HTTP assembly
// ---------------------------------------------------------------------------

/// CORS policy: permissive when `allowed_origins` is empty, otherwise only those origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = o.as_str(), "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
}

/// The full application: listing routes plus tracing, compression, and CORS layers.
pub fn app(store: Arc<dyn GiftStore>, allowed_origins: &[String]) -> Router {
    router(AppContext::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(allowed_origins))
}

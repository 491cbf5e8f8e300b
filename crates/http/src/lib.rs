//! HTTP API layer for GiftLink.
//!
//! - [`api`]: Route handlers
//! - [`error`]: Error-to-response mapping
//!
//! [`router`] wires the handlers onto their paths; callers add their own layers
//! (tracing, CORS, compression).

pub mod api;
pub mod error;

use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, Router};
use giftlink_core::GiftStore;

use api::*;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn GiftStore>,
    pub start_time: Instant,
}

impl AppContext {
    pub fn new(store: Arc<dyn GiftStore>) -> Self {
        Self { store, start_time: Instant::now() }
    }
}

/// Build the listing service routes over `ctx`.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(api_health))
        .route("/api/gifts", get(api_list_gifts).post(api_create_gift))
        .route("/api/gifts/{id}", get(api_get_gift))
        .route("/api/search", get(api_search))
        .with_state(ctx)
}

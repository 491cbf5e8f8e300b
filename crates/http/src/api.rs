use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use giftlink_core::types::FIELD_NATIVE_ID;
use giftlink_core::{resolve_gift, Gift, GiftQuery};

use crate::error::AppError;
use crate::AppContext;

// ---------------------------------------------------------------------------
// GET /api/gifts
// ---------------------------------------------------------------------------

pub async fn api_list_gifts(State(ctx): State<AppContext>) -> Result<Json<Vec<Gift>>, AppError> {
    let gifts = ctx.store.all().await.map_err(AppError::ListFailed)?;
    debug!(count = gifts.len(), "Listed gifts");
    Ok(Json(gifts))
}

// ---------------------------------------------------------------------------
// GET /api/gifts/{id}
// ---------------------------------------------------------------------------

/// Look up one gift. The id may be a string id, a numeric id, or a native object id.
pub async fn api_get_gift(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Gift>, AppError> {
    resolve_gift(ctx.store.as_ref(), &id)
        .await
        .map_err(AppError::LookupFailed)?
        .map(Json)
        .ok_or(AppError::GiftNotFound)
}

// ---------------------------------------------------------------------------
// POST /api/gifts
// ---------------------------------------------------------------------------

/// Insert the body verbatim. Responds with the assigned `_id` merged under the body.
pub async fn api_create_gift(
    State(ctx): State<AppContext>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let inserted_id = ctx.store.insert(body.clone()).await?;

    let mut created = Map::new();
    created.insert(FIELD_NATIVE_ID.to_string(), inserted_id);
    if let Value::Object(fields) = body {
        created.extend(fields);
    }

    info!(id = %created[FIELD_NATIVE_ID], "Created gift");
    Ok((StatusCode::CREATED, Json(Value::Object(created))))
}

// ---------------------------------------------------------------------------
// GET /api/search
// ---------------------------------------------------------------------------

/// Filter by `name` (case-insensitive substring), `age_years` (ceiling), `category`
/// and `condition` (exact). No parameters returns every gift.
pub async fn api_search(
    State(ctx): State<AppContext>,
    Query(query): Query<GiftQuery>,
) -> Result<Json<Vec<Gift>>, AppError> {
    let gifts = ctx.store.search(&query).await.map_err(AppError::SearchFailed)?;
    debug!(params = ?query.to_pairs(), count = gifts.len(), "Searched gifts");
    Ok(Json(gifts))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub async fn api_health(State(ctx): State<AppContext>) -> impl IntoResponse {
    let uptime_secs = ctx.start_time.elapsed().as_secs();
    match ctx.store.count().await {
        Ok(count) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "store": ctx.store.name(),
                "gifts": count,
                "uptime_secs": uptime_secs,
            })),
        ),
        Err(e) => {
            warn!(error = %e, "Health check could not reach the store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "store": ctx.store.name(),
                    "uptime_secs": uptime_secs,
                })),
            )
        }
    }
}

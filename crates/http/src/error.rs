use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use giftlink_core::StoreError;
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the listing endpoints.
///
/// Each variant fixes both the status code and the body shape the route has always
/// returned: list and search answer with plain text, lookup with a JSON `{error}` object.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Gift not found")]
    GiftNotFound,

    #[error("Error fetching gifts")]
    ListFailed(#[source] StoreError),

    #[error("Error fetching gift")]
    LookupFailed(#[source] StoreError),

    #[error("Error searching gifts")]
    SearchFailed(#[source] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::GiftNotFound => StatusCode::NOT_FOUND,
            AppError::ListFailed(_)
            | AppError::LookupFailed(_)
            | AppError::SearchFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match self {
            AppError::GiftNotFound => {
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            }
            AppError::LookupFailed(ref cause) => {
                error!(error = %cause, "{message}");
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            }
            AppError::ListFailed(ref cause)
            | AppError::SearchFailed(ref cause)
            | AppError::Internal(ref cause) => {
                error!(error = %cause, "{message}");
                (status, message).into_response()
            }
        }
    }
}

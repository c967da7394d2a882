use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Errors from the statistics aggregator
///
/// Clone so one failed computation can be handed to every caller that joined
/// it; the database error is carried as text for that reason.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StatsError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        StatsError::DatabaseError(err.to_string())
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::DatabaseError(msg) => {
                ApiError::InternalError(format!("stats computation failed: {}", msg))
            }
        }
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

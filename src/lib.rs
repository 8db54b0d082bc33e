pub mod config;
pub mod contact;
pub mod db;
pub mod form;
pub mod schema;

use axum::{
    debug_handler,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing::error;

use schema::{ErrorBody, FieldErrors};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", contact::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[debug_handler]
async fn health(State(db_pool): State<SqlitePool>) -> (StatusCode, Json<Value>) {
    if let Err(err) = sqlx::query("SELECT 1").execute(&db_pool).await {
        error!("database health check failed: {err:?}");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "db": "down" })),
        );
    }

    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The body parsed but broke one or more field rules.
    Invalid(FieldErrors),
    /// The body could not be read as a submission at all.
    BadRequest(String),
    Internal(anyhow::Error),
}

pub const INVALID_MESSAGE: &str = "Invalid contact submission";
pub const INTERNAL_MESSAGE: &str = "Failed to save contact submission";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Invalid(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { message: INVALID_MESSAGE.to_owned(), errors: Some(errors) },
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { message, errors: None },
            ),
            AppError::Internal(err) => {
                error!("{err}\n\n{}", err.backtrace());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody { message: INTERNAL_MESSAGE.to_owned(), errors: None },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(sqlx::Error);
apperr_impl!(uuid::Error);
apperr_impl!(time::error::Format);
apperr_impl!(time::error::Parse);

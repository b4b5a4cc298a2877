use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    #[error("Key-value store error: {0}")]
    KeyValue(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_)
            | Self::Document(_)
            | Self::KeyValue(_)
            | Self::Serialization(_)
            | Self::Internal(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            Self::Database(e) => {
                tracing::error!("Database error: {e:?}");
                "Database error".to_string()
            }
            Self::Document(e) => {
                tracing::error!("Document store error: {e:?}");
                "Document store error".to_string()
            }
            Self::KeyValue(e) => {
                tracing::error!("Key-value store error: {e:?}");
                "Key-value store error".to_string()
            }
            Self::Serialization(e) => {
                tracing::error!("Serialization error: {e:?}");
                "Internal server error".to_string()
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            Self::Config(e) => {
                tracing::error!("Config error: {e:?}");
                "Configuration error".to_string()
            }
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

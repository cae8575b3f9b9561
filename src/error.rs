use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error("Validation failed on `{field}`: {constraint}")]
    Validation { field: String, constraint: String },

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Concurrent write on trip {id} (expected version {expected})")]
    Conflict { id: String, expected: u64 },

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type TripResult<T> = Result<T, TripError>;

impl TripError {
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        TripError::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        TripError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            TripError::Validation { .. } => "VALIDATION_ERROR",
            TripError::Integrity(_) => "INTEGRITY_ERROR",
            TripError::NotFound { .. } => "NOT_FOUND",
            TripError::Conflict { .. } => "CONFLICT",
            TripError::InvalidId(_) => "BAD_REQUEST",
            TripError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for TripError {
    fn status_code(&self) -> StatusCode {
        match self {
            TripError::Validation { .. } | TripError::InvalidId(_) => StatusCode::BAD_REQUEST,
            TripError::Integrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TripError::NotFound { .. } => StatusCode::NOT_FOUND,
            TripError::Conflict { .. } => StatusCode::CONFLICT,
            TripError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            TripError::Validation { field, .. } => json!({
                "error": self.to_string(),
                "code": self.code(),
                "field": field,
            }),
            TripError::Database(err) => {
                log::error!("Database error: {}", err);
                json!({
                    "error": "An internal error occurred",
                    "code": self.code(),
                })
            }
            _ => json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

//! API request/response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::FieldError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// 422 body carrying field-level validation detail.
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub fields: Vec<FieldError>,
}

impl ValidationErrorResponse {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self {
            error: "validation_failed".to_string(),
            fields,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EligibleQuery {
    pub path: String,
}

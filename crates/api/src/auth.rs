//! Simple bearer token authentication middleware.
//!
//! Development: accepts any "admin:password" login, returns a static token.
//! Production: replace with JWT + OAuth2 (jsonwebtoken crate + Auth0/Ory).
//!
//! The tracking and eligibility endpoints stay public: any visitor's
//! browser reports its own impressions and clicks.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::models::{ErrorResponse, LoginRequest, LoginResponse};

/// Hard-coded API token for development. Production: use JWT.
const DEV_TOKEN_PREFIX: &str = "pp_dev_";

/// Validate a login request and return a bearer token.
pub fn authenticate(req: &LoginRequest) -> Result<LoginResponse, String> {
    // Development: accept admin/admin or any user with password "popups2024"
    if (req.username == "admin" && req.password == "admin") || req.password == "popups2024" {
        Ok(LoginResponse {
            token: generate_token(),
            user: req.username.clone(),
            expires_at: Utc::now() + Duration::hours(24),
        })
    } else {
        Err("Invalid credentials".to_string())
    }
}

fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!(
        "{}{}",
        DEV_TOKEN_PREFIX,
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
    )
}

/// True for endpoints a visitor's browser calls directly.
fn is_public(path: &str) -> bool {
    path.ends_with("/auth/login")
        || path.starts_with("/health")
        || path.ends_with("/eligible")
        || path.contains("/track/")
        || !path.contains("/api/v1/popups")
}

/// Axum middleware layer that checks for a valid bearer token on the
/// campaign-management routes.
pub async fn auth_middleware(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if is_public(&path) {
        return next.run(req).await;
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            let token = &value[7..];
            if token.starts_with(DEV_TOKEN_PREFIX) && token.len() > DEV_TOKEN_PREFIX.len() {
                next.run(req).await
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "invalid_token".to_string(),
                        message: "Invalid or expired bearer token".to_string(),
                    }),
                )
                    .into_response()
            }
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "missing_auth".to_string(),
                message: "Authorization header with Bearer token required".to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public("/health"));
        assert!(is_public("/api/v1/popups/auth/login"));
        assert!(is_public("/api/v1/popups/eligible"));
        assert!(is_public(
            "/api/v1/popups/9f4c7d52-0000-0000-0000-000000000000/track/impressions"
        ));
        assert!(!is_public("/api/v1/popups"));
        assert!(!is_public(
            "/api/v1/popups/9f4c7d52-0000-0000-0000-000000000000"
        ));
    }

    #[test]
    fn test_authenticate_dev_credentials() {
        let ok = authenticate(&LoginRequest {
            username: "admin".to_string(),
            password: "admin".to_string(),
        });
        assert!(ok.is_ok());
        assert!(ok.unwrap().token.starts_with(DEV_TOKEN_PREFIX));

        let bad = authenticate(&LoginRequest {
            username: "admin".to_string(),
            password: "wrong".to_string(),
        });
        assert!(bad.is_err());
    }
}

//! API key authentication middleware

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Hash an API key for comparison
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// The configured operator token, kept only as a hash
#[derive(Clone)]
pub struct ApiKeyAuth {
    token_hash: Arc<Option<String>>,
}

impl ApiKeyAuth {
    /// With no token configured every request is rejected
    pub fn new(token: Option<&str>) -> Self {
        if token.is_none() {
            tracing::warn!("API_TOKEN not set, protected routes will reject every request");
        }
        Self {
            token_hash: Arc::new(token.map(hash_api_key)),
        }
    }

    fn accepts(&self, presented: &str) -> bool {
        self.token_hash
            .as_deref()
            .is_some_and(|expected| expected == hash_api_key(presented))
    }
}

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
///
/// Routes that require authentication should use this middleware.
pub async fn auth_middleware(
    State(auth): State<ApiKeyAuth>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(&request).ok_or(AppError::Unauthorized)?;

    if !auth.accepts(api_key) {
        tracing::warn!(path = %request.uri().path(), "Rejected request with invalid API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

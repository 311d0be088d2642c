//! Admin authentication middleware
//!
//! GET and DELETE requests carry `timestamp` and `hash` as query
//! parameters; POST and PUT requests carry them in the JSON body, which is
//! hashed in full. A shared secret of 0 disables checking.

use axum::{
    body::{to_bytes, Body},
    extract::{Query, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use mirror_common::api::auth::{validate_hash, validate_timestamp, ApiAuthError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::AppState;

/// Largest request body buffered for hash validation
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Deserialize)]
struct AuthQuery {
    timestamp: Option<i64>,
    hash: Option<String>,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let secret = state.shared_secret;
    if secret == 0 {
        debug!("Admin authentication disabled (shared_secret = 0)");
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let request = match method {
        Method::GET | Method::DELETE => {
            check_query(&request, secret)?;
            request
        }
        Method::POST | Method::PUT => check_body(request, secret).await?,
        other => return Err(AuthError::MethodNotAllowed(other)),
    };

    Ok(next.run(request).await)
}

fn check_query(request: &Request, secret: i64) -> Result<(), ApiAuthError> {
    let Query(query) = Query::<AuthQuery>::try_from_uri(request.uri())
        .map_err(|e| ApiAuthError::Malformed(e.body_text()))?;

    let timestamp = query.timestamp.ok_or(ApiAuthError::MissingTimestamp)?;
    let hash = query.hash.ok_or(ApiAuthError::MissingHash)?;
    validate_timestamp(timestamp)?;

    // Only the two auth fields are signed for query requests
    validate_hash(&hash, &json!({ "timestamp": timestamp, "hash": &hash }), secret)
}

/// Validate a JSON body and hand back an equivalent request
async fn check_body(request: Request, secret: i64) -> Result<Request, ApiAuthError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiAuthError::Malformed(format!("Failed to read body: {}", e)))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ApiAuthError::Malformed(format!("Invalid JSON: {}", e)))?;

    let timestamp = value
        .get("timestamp")
        .and_then(Value::as_i64)
        .ok_or(ApiAuthError::MissingTimestamp)?;
    let hash = value
        .get("hash")
        .and_then(Value::as_str)
        .ok_or(ApiAuthError::MissingHash)?;

    validate_timestamp(timestamp)?;
    validate_hash(hash, &value, secret)?;

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

/// Authentication failure reported to the client
#[derive(Debug)]
pub enum AuthError {
    Rejected(ApiAuthError),
    MethodNotAllowed(Method),
}

impl From<ApiAuthError> for AuthError {
    fn from(err: ApiAuthError) -> Self {
        AuthError::Rejected(err)
    }
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::Rejected(ApiAuthError::InvalidTimestamp { .. })
            | AuthError::Rejected(ApiAuthError::InvalidHash { .. }) => StatusCode::UNAUTHORIZED,
            AuthError::Rejected(ApiAuthError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Rejected(_) => StatusCode::BAD_REQUEST,
            AuthError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AuthError::Rejected(ApiAuthError::InvalidHash {
                provided,
                calculated,
            }) => {
                warn!(
                    "Hash validation failed: provided={}, calculated={}",
                    provided, calculated
                );
                "Invalid hash".to_string()
            }
            AuthError::Rejected(err) => {
                warn!("Admin request rejected: {}", err);
                err.to_string()
            }
            AuthError::MethodNotAllowed(method) => {
                format!("{} is not supported on admin routes", method)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

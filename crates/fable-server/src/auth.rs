use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use fable_core::{Envelope, ErrorCode};
use http::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};

/// Static bearer gate for mutating requests
///
/// POST/PUT/PATCH/DELETE must carry `Authorization: Bearer <token>`; reads
/// and the health probe stay public. Token issuance belongs to the platform,
/// this service only verifies.
pub async fn auth_middleware(token: SecretString, request: Request, next: Next) -> Response {
    let mutating = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    );
    if !mutating {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(presented) if presented == token.expose_secret() => next.run(request).await,
        _ => {
            tracing::warn!(path = request.uri().path(), "rejected unauthenticated mutating request");
            let envelope = Envelope::fail("missing or invalid bearer token", ErrorCode::Unauthorized);
            (StatusCode::UNAUTHORIZED, Json(envelope)).into_response()
        }
    }
}

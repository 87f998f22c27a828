use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness probe for the service itself (the TTS health proxy lives on the
/// audio router)
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

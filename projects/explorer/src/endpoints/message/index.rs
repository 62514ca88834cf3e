pub const GREETING: &str = "👋 Hello from the backend!";

/// Axum handler: GET /api/message
pub async fn handler() -> &'static str {
    GREETING
}

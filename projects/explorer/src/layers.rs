use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tower_http::{
    cors::{self, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::warn;

use crate::config::AllowedOrigin;

pub const ORIGIN_REJECTED_MESSAGE: &str = "Not allowed by CORS";

#[derive(Debug, Serialize)]
struct RejectionBody {
    message: &'static str,
}

/// Rejects browser requests from origins other than the configured one.
///
/// Requests without an `Origin` header (curl, server-to-server) pass.
pub async fn enforce_allowed_origin(
    State(allowed): State<AllowedOrigin>,
    request: Request,
    next: Next,
) -> Response {
    let rejected = request
        .headers()
        .get(header::ORIGIN)
        .filter(|origin| !allowed.permits(origin))
        .cloned();

    if let Some(origin) = rejected {
        warn!(?origin, path = %request.uri().path(), "rejecting request from disallowed origin");
        return (
            StatusCode::FORBIDDEN,
            Json(RejectionBody {
                message: ORIGIN_REJECTED_MESSAGE,
            }),
        )
            .into_response();
    }

    next.run(request).await
}

pub fn cors(allowed: &AllowedOrigin) -> CorsLayer {
    let origin = match allowed {
        AllowedOrigin::Any => cors::AllowOrigin::any(),
        AllowedOrigin::Exact(origin) => cors::AllowOrigin::exact(origin.clone()),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
}

/// Hardening headers added to every response that does not already set them.
pub fn security_headers() -> [SetResponseHeaderLayer<HeaderValue>; 5] {
    let headers: [(HeaderName, &'static str); 5] = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        (header::REFERRER_POLICY, "no-referrer"),
        (header::X_DNS_PREFETCH_CONTROL, "off"),
        (
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=31536000; includeSubDomains",
        ),
    ];

    headers.map(|(name, value)| {
        SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
    })
}

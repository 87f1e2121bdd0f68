use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new("client/dist")
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn(set_static_cache_control));

    let app = Router::new()
        .route(
            "/api/create-payment-intent",
            axum::routing::post(routes::payments::create_payment_intent),
        )
        .route("/api/health", axum::routing::get(routes::api::health))
        .route("/api/metrics", axum::routing::get(routes::api::metrics));

    app.layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .fallback_service(static_assets)
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    if path.starts_with("/fonts/") || path.starts_with("/icons/") {
        return Some("public, max-age=86400");
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/grid-client-71578f6b278221f3_bg.wasm"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(
            cache_control_for_path("/input-a93762ff3bf6d63a.css"),
            Some("public, max-age=31536000, immutable")
        );
    }

    #[test]
    fn short_cache_for_unhashed_static_assets() {
        assert_eq!(
            cache_control_for_path("/icons/link.svg"),
            Some("public, max-age=86400")
        );
        assert_eq!(
            cache_control_for_path("/fonts/inter-regular.woff2"),
            Some("public, max-age=86400")
        );
    }

    #[test]
    fn no_cache_header_override_for_html() {
        assert_eq!(cache_control_for_path("/"), None);
        assert_eq!(cache_control_for_path("/index.html"), None);
    }
}

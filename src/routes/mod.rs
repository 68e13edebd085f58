//! Router assembly: route groups plus tracing, body-limit and CORS middleware.

mod common;
mod drug;

pub use common::common_routes;
pub use drug::drug_routes;

use crate::config::{CorsOrigins, Settings};
use crate::openapi;
use crate::state::AppState;
use axum::{http::HeaderValue, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Full application router for `state`, honoring the CORS and swagger toggles.
pub fn app(state: AppState) -> Router {
    let settings = state.settings.clone();
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(drug_routes(state));
    if settings.enable_swagger_ui {
        router = router.merge(openapi_routes(&settings));
    }
    let router = router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT)),
    );
    if settings.enable_cors {
        router.layer(cors_layer(&settings.cors_origins))
    } else {
        router
    }
}

/// GET /openapi.json
pub fn openapi_routes(settings: &Settings) -> Router {
    let doc = openapi::document(settings);
    Router::new().route(
        "/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { Json(doc) }
        }),
    )
}

/// `*` allows any origin without credentials; an explicit list allows credentials.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::HeaderValue,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::store::SharedStore;
use crate::handlers::resource;
use crate::middleware;
use crate::policy::PolicyEngine;
use crate::resource::ResourceService;

/// Assemble the application router.
///
/// Public surface: service info, health, and the per-entity reference
/// listing. Everything else sits behind the bearer-JWT middleware; the
/// permission checks themselves live in the resource service.
pub fn router(store: SharedStore, policy: Arc<dyn PolicyEngine>) -> Router {
    let service = Arc::new(ResourceService::new(store.clone(), policy));

    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/v1/:entity/all", get(resource::all));

    let admin = Router::new()
        .route("/v1/:entity", get(resource::index).post(resource::store))
        .route(
            "/v1/:entity/:id",
            get(resource::show)
                .put(resource::update)
                .delete(resource::destroy),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_auth));

    let mut app = public
        .merge(admin)
        .layer(Extension(service))
        .layer(Extension(store))
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        app = app.layer(cors_layer());
    }

    app
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().security.cors_origins;
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    let entities: Vec<&str> = crate::entity::ENTITIES.iter().map(|def| def.slug).collect();

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Padron API",
            "version": version,
            "description": "Membership and content administration API",
            "entities": entities,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "reference": "/v1/:entity/all (public)",
                "admin": "/v1/:entity[/:id] (bearer token + permission)",
            }
        }
    }))
}

async fn health(Extension(store): Extension<SharedStore>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match store.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "storage unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "storage_error": e.to_string()
                }
            })),
        ),
    }
}

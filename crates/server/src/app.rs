// Router assembly
// Decision: One builder shared by the server binary and the HTTP tests, so tests
// exercise the same prefixing, CORS and tracing layers as production

use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use rollcall_core::DocumentStore;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::services::{EventService, ParticipantService};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    storage: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
    })
}

/// GET / - Greeting
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting", body = String)
    ),
    tag = "root"
)]
pub async fn home() -> Json<&'static str> {
    Json("Hola Mundo")
}

/// Build the full application router on top of `store`.
pub fn build_app(store: Arc<dyn DocumentStore>, config: &ServerConfig) -> Router {
    let events = Arc::new(EventService::new(store, config.max_write_attempts));
    let participants = Arc::new(ParticipantService::new(events.clone()));
    let health_state = HealthState {
        storage: events.backend_name(),
    };

    let api_routes = Router::new()
        .route("/", get(home))
        .merge(api::events::routes(api::events::AppState::new(events)))
        .merge(api::participants::routes(api::participants::AppState::new(
            participants,
        )));

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    // Health is never prefixed
    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let app = match cors_layer(&config.cors_allowed_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

/// CORS layer for the configured origins. `None` means same-origin only.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        return None;
    }
    tracing::info!(origins = ?origins, "CORS origins configured");

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
            .allow_credentials(true),
    )
}

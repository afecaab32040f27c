use axum::{
    http::{header, HeaderName},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{
    credentials::CredentialController,
    generation::{GenerationController, X_SEGMENTS_COMPLETED, X_SEGMENTS_FAILED},
    health,
    segments::SegmentController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::{request_id_middleware, X_REQUEST_ID};
use crate::infrastructure::repositories::SettingsRepository;

/// Everything the router dispatches to
#[derive(Clone)]
pub struct AppControllers {
    pub settings: Arc<dyn SettingsRepository>,
    pub segments: Arc<SegmentController>,
    pub generation: Arc<GenerationController>,
    pub credentials: Arc<CredentialController>,
}

pub fn build_router(controllers: AppControllers) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(controllers.settings);

    let segment_routes = Router::new()
        .route(
            "/api/segments",
            get(SegmentController::list).post(SegmentController::load_text),
        )
        .route("/api/segments/selection", post(SegmentController::toggle_select_all))
        .route("/api/segments/:id", patch(SegmentController::edit))
        .route("/api/segments/:id/selection", post(SegmentController::toggle_selected))
        .route("/api/segments/:id/audio", get(SegmentController::audio))
        .with_state(controllers.segments);

    let generation_routes = Router::new()
        .route(
            "/api/segments/:id/generate",
            post(GenerationController::generate_segment),
        )
        .route(
            "/api/batch",
            get(GenerationController::batch_status).post(GenerationController::run_batch),
        )
        .route("/api/export/selected", post(GenerationController::export_selected))
        .route("/api/voices", get(GenerationController::voices))
        .route("/api/voices/preview", post(GenerationController::preview))
        .with_state(controllers.generation);

    let credential_routes = Router::new()
        .route(
            "/api/credentials",
            get(CredentialController::get_credentials).put(CredentialController::set_credentials),
        )
        .route("/api/credentials/shared", post(CredentialController::use_shared))
        .route("/api/usage", get(CredentialController::get_usage))
        .with_state(controllers.credentials);

    // downloads and batch counters must be readable from browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(X_SEGMENTS_COMPLETED),
            HeaderName::from_static(X_SEGMENTS_FAILED),
            HeaderName::from_static(X_REQUEST_ID),
        ]);

    Router::new()
        .merge(health_routes)
        .merge(segment_routes)
        .merge(generation_routes)
        .merge(credential_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    controllers: AppControllers,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(controllers);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

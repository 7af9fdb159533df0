use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::pass::PassRecord;
use crate::scene::Scene;

use super::api::playback as playback_handlers;
use super::api::view as view_handlers;
use super::api_doc::ApiDoc;
use super::session::{Session, SessionHandle};
use super::ui::handlers as ui_handlers;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    pub refresh_ms: u64,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::view))
        // View API endpoints
        .route("/api/view.svg", get(view_handlers::view_svg))
        .route("/api/status", get(view_handlers::status))
        .route("/api/trajectory", get(view_handlers::trajectory))
        .route("/api/path", get(view_handlers::path))
        .route("/api/pass", post(view_handlers::select_pass))
        .route("/api/observer", post(view_handlers::set_observer))
        // Playback API endpoints
        .route("/api/playback/toggle", post(playback_handlers::toggle))
        .route("/api/playback/reset", post(playback_handlers::reset))
        .route("/api/retry", post(playback_handlers::retry))
        .route("/api/close", post(playback_handlers::close))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, pass: Option<PassRecord>) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let mut scene = Scene::new(config.scene(), config.observer);

    if let Some(pass) = pass {
        if let Err(e) = scene.select_pass(pass) {
            log::warn!("Initial pass not shown: {}", e);
        }
    }

    let session = Session::spawn(scene, config.renderer(), config.playback.frame_interval);
    let state = AppState {
        session: session.handle(),
        refresh_ms: (config.playback.frame_interval.as_millis() as u64).max(50),
    };
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    session.shutdown().await;
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

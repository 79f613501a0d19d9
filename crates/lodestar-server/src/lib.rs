pub mod embed;
pub mod error;
pub mod offline;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};

use lodestar_core::config::Config;
use lodestar_core::store::Store;
use muse_client::MuseClient;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Profiles
        .route("/api/profiles", get(routes::profiles::list_profiles))
        .route("/api/profiles", post(routes::profiles::create_profile))
        .route("/api/profiles/{user}", get(routes::profiles::get_profile))
        // Check-ins
        .route(
            "/api/checkins/morning",
            post(routes::checkins::submit_morning),
        )
        .route(
            "/api/checkins/evening",
            post(routes::checkins::submit_evening),
        )
        .route("/api/checkins/{user}", get(routes::checkins::list_checkins))
        .route(
            "/api/checkins/{user}/{date}",
            get(routes::checkins::get_checkin),
        )
        // Streaks
        .route("/api/streaks/{user}", get(routes::streaks::get_streak))
        // Blueprints
        .route("/api/blueprints/generate", post(routes::blueprints::generate))
        .route("/api/blueprints/{user}", get(routes::blueprints::get_active))
        .route(
            "/api/blueprints/{user}/versions",
            get(routes::blueprints::list_versions),
        )
        .route(
            "/api/blueprints/{user}/{version}/activate",
            post(routes::blueprints::activate),
        )
        // Pulses
        .route("/api/pulses/generate", post(routes::pulses::generate))
        .route("/api/pulses/{user}", get(routes::pulses::list_pulses))
        .route(
            "/api/pulses/{user}/{week_start}",
            get(routes::pulses::get_pulse),
        )
        // Share card
        .route("/api/share/{user}", get(routes::share::share_card))
        .fallback(offline::gateway)
        .layer(cors)
        .with_state(app_state)
}

/// Open the store and construct shared state from a loaded config.
///
/// The text client is built only when the config has a `muse` section and
/// its API key environment variable is set; otherwise the server runs with
/// generation endpoints returning 503.
pub fn app_state(home: &Path, config: &Config) -> anyhow::Result<state::AppState> {
    let store = Store::open(&config.data_path(home))?;

    let muse = match (&config.muse, config.muse_api_key()) {
        (Some(muse_cfg), Some(key)) => Some(MuseClient::new(
            &muse_cfg.endpoint,
            key,
            &muse_cfg.model,
            muse_cfg.max_tokens,
        )),
        (Some(muse_cfg), None) => {
            tracing::warn!(
                env = %muse_cfg.api_key_env,
                "muse configured but API key not set; generation disabled"
            );
            None
        }
        (None, _) => None,
    };

    Ok(state::AppState::new(store, muse, &config.offline))
}

/// Start the API server.
pub async fn serve(
    home: std::path::PathBuf,
    config: Config,
    port: u16,
    open_browser: bool,
) -> anyhow::Result<()> {
    let app = build_router(app_state(&home, &config)?);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("lodestar server listening on http://localhost:{port}");

    if open_browser {
        let url = format!("http://localhost:{port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so
/// the caller can read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    home: std::path::PathBuf,
    config: Config,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state(&home, &config)?);

    tracing::info!("lodestar server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use ledger_core::config::LedgerConfig;
use std::path::{Path, PathBuf};
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(db_path: &Path, config: LedgerConfig) -> anyhow::Result<Router> {
    let app_state = state::AppState::new(db_path, config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Refill trigger (registered before the {user_id} capture)
        .route(
            "/api/credits/refill",
            get(routes::refill::trigger_refill).post(routes::refill::trigger_refill),
        )
        // Credits
        .route("/api/credits/{user_id}", get(routes::credits::get_credits))
        .route(
            "/api/credits/{user_id}/initialize",
            post(routes::credits::initialize_credits),
        )
        .route(
            "/api/credits/{user_id}/consume",
            post(routes::credits::consume_credit),
        )
        .route(
            "/api/credits/{user_id}/add",
            post(routes::credits::add_credits),
        )
        .route(
            "/api/credits/{user_id}/purchases",
            get(routes::credits::list_purchases),
        )
        // Packs
        .route("/api/packs", get(routes::packs::list_packs))
        .route(
            "/api/packs/{pack_id}/purchase",
            post(routes::packs::purchase_pack),
        )
        // Rewards
        .route("/api/rewards/{user_id}", get(routes::rewards::get_rewards))
        .route(
            "/api/rewards/{user_id}/award",
            post(routes::rewards::award_xp),
        )
        .layer(cors)
        .with_state(app_state);

    Ok(router)
}

/// Start the ledger API server.
pub async fn serve(db_path: PathBuf, config: LedgerConfig, port: u16) -> anyhow::Result<()> {
    let app = build_router(&db_path, config)?;

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("ledger API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the ledger API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    db_path: PathBuf,
    config: LedgerConfig,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(&db_path, config)?;

    tracing::info!("ledger API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}

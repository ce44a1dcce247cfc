//! # bouncer-api — Validated JSON Resources over Axum
//!
//! Mounts resources whose request bodies are validated by a registered
//! [`Bouncer`](bouncer_schema::Bouncer) before any handler runs.
//!
//! ## API Surface
//!
//! | Prefix              | Module                 |
//! |---------------------|------------------------|
//! | `/v1/articles/*`    | [`routes::articles`]   |
//! | `/health/*`         | probes                 |
//!
//! ## Request Path
//!
//! ```text
//! TraceLayer → Bounced<T> / BouncedPatch<T> → Handler
//! ```
//!
//! Rejected bodies never reach the handler; they are answered with the
//! violation list by [`error::AppError`].

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod patch;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted outside the trace layer.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::articles::router())
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — every shape was registered when the state was built,
/// so a running router is ready.
async fn readiness() -> &'static str {
    "ready"
}

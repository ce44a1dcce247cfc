//! # Request/Response Tracing
//!
//! Configures `tower_http::trace::TraceLayer` so every request through the
//! validating routes gets a span with method, URI, and status code.

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Build the `TraceLayer` for the API routes.
///
/// Responses are logged at `info`; 5xx responses are additionally
/// classified as failures and logged at `error`.
pub fn layer(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, DefaultMakeSpan, (), DefaultOnResponse> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(())
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

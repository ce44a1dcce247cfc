//! # Middleware
//!
//! - `tracing_layer` — request/response spans via `tower_http`.

pub mod tracing_layer;

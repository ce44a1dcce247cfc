//! # API Route Modules
//!
//! - `articles` — the article resource; create, replace and patch bodies
//!   pass through the validating extractors.

pub mod articles;

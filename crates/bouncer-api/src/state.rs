//! # Application State
//!
//! Shared state for the Axum application: configuration, in-memory
//! resource stores, and the registered bouncers.
//!
//! Every mounted shape is registered in [`AppState::with_config`], so a
//! misconfigured schema stops the process before it starts serving.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::FromRef;
use bouncer_schema::{Bouncer, SchemaError};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::extractors::{BodyLimits, DEFAULT_CREATE_BODY_LIMIT, DEFAULT_UPDATE_BODY_LIMIT};
use crate::routes::articles::{Article, ArticleRecord};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await` points.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Read, check and update a record under one write lock.
    ///
    /// Returns `None` if the record doesn't exist, or `Some(result)` with
    /// the closure's `Result`. On `Err` the closure must leave the record
    /// untouched.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Configuration ------------------------------------------------------------

/// Log output format for the binary's subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Only `json` (any case) selects JSON output.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Maximum accepted body size for create requests, in bytes.
    pub max_create_body_bytes: usize,
    /// Maximum accepted body size for partial updates, in bytes.
    pub max_update_body_bytes: usize,
    /// Subscriber output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            max_create_body_bytes: DEFAULT_CREATE_BODY_LIMIT,
            max_update_body_bytes: DEFAULT_UPDATE_BODY_LIMIT,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// Unparseable values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            max_create_body_bytes: parse_or(
                &lookup,
                "BOUNCER_MAX_CREATE_BODY_BYTES",
                defaults.max_create_body_bytes,
            ),
            max_update_body_bytes: parse_or(
                &lookup,
                "BOUNCER_MAX_BODY_BYTES",
                defaults.max_update_body_bytes,
            ),
            log_format: LogFormat::parse(lookup("LOG_FORMAT").as_deref()),
        }
    }

    /// Body bounds for the validating extractors.
    pub fn body_limits(&self) -> BodyLimits {
        BodyLimits {
            create: self.max_create_body_bytes,
            update: self.max_update_body_bytes,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "invalid configuration value, using default");
            default
        }),
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub articles: Store<ArticleRecord>,
    article_bouncer: Arc<Bouncer<Article>>,
}

impl AppState {
    /// State with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a mounted shape fails registration.
    pub fn new() -> Result<Self, SchemaError> {
        Self::with_config(AppConfig::default())
    }

    /// State with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a mounted shape fails registration.
    pub fn with_config(config: AppConfig) -> Result<Self, SchemaError> {
        Ok(Self {
            config,
            articles: Store::new(),
            article_bouncer: Arc::new(Bouncer::new()?),
        })
    }
}

impl FromRef<AppState> for Arc<Bouncer<Article>> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.article_bouncer)
    }
}

impl FromRef<AppState> for BodyLimits {
    fn from_ref(state: &AppState) -> Self {
        state.config.body_limits()
    }
}

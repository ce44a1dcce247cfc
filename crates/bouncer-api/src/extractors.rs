//! # Validating Extractors
//!
//! [`Bounced<T>`] and [`BouncedPatch<T>`] are the request guards. They read
//! the body under a size limit, run it through the shape's registered
//! [`Bouncer`], and either hand the result to the handler or reject the
//! request with the violation list before the handler runs.
//!
//! The handler argument *is* the request-scoped channel: the decoded
//! instance (and for patches, the merged document) reaches the next stage
//! only through it.
//!
//! ```ignore
//! async fn create(State(state): State<AppState>, Bounced(article): Bounced<Article>) { .. }
//! async fn patch(Path(id): Path<Uuid>, patch: BouncedPatch<Article>) { .. }
//! ```
//!
//! The router state must provide `Arc<Bouncer<T>>` and [`BodyLimits`]
//! through `FromRef`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRef, FromRequest, Request};
use bouncer_core::{Operation, ViolationKind, Violations};
use bouncer_schema::{Bouncer, Merged, Shape, Validated};

use crate::error::AppError;

/// Default create-body bound, matching axum's default body limit.
pub const DEFAULT_CREATE_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Default partial-update body bound.
pub const DEFAULT_UPDATE_BODY_LIMIT: usize = 1024 * 1024;

/// Maximum body sizes, enforced before any decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimits {
    /// Bound for create (and non-write) requests.
    pub create: usize,
    /// Bound for partial updates.
    pub update: usize,
}

impl BodyLimits {
    /// The bound applying to `operation`.
    pub fn for_operation(&self, operation: Operation) -> usize {
        match operation {
            Operation::Update => self.update,
            Operation::Create | Operation::None => self.create,
        }
    }
}

impl Default for BodyLimits {
    fn default() -> Self {
        Self {
            create: DEFAULT_CREATE_BODY_LIMIT,
            update: DEFAULT_UPDATE_BODY_LIMIT,
        }
    }
}

/// A request body decoded into `T` that passed validation for the
/// request's operation.
#[derive(Debug, Clone)]
pub struct Bounced<T>(pub T);

/// A partial-update body that passed validation, with the whitelist-merged
/// document holding only the keys the client sent.
#[derive(Debug, Clone)]
pub struct BouncedPatch<T> {
    /// The decoded, trimmed instance (zero-filled where keys were omitted).
    pub instance: T,
    /// The merged JSON document, safe to apply as a patch.
    pub document: Vec<u8>,
}

impl<T> BouncedPatch<T> {
    /// Parse the merged document.
    pub fn document_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.document)
    }
}

impl<S, T> FromRequest<S> for Bounced<T>
where
    S: Send + Sync,
    T: Shape,
    Arc<Bouncer<T>>: FromRef<S>,
    BodyLimits: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method().as_str());
        let limit = BodyLimits::from_ref(state).for_operation(operation);
        let body = read_body(req, limit).await?;

        let bouncer = Arc::<Bouncer<T>>::from_ref(state);
        let Validated {
            instance,
            violations,
        } = bouncer.validate(&body, operation)?;

        if !violations.is_empty() {
            return Err(AppError::Rejected(violations));
        }
        Ok(Self(instance))
    }
}

impl<S, T> FromRequest<S> for BouncedPatch<T>
where
    S: Send + Sync,
    T: Shape,
    Arc<Bouncer<T>>: FromRef<S>,
    BodyLimits: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method().as_str());
        let body = read_body(req, BodyLimits::from_ref(state).update).await?;

        let bouncer = Arc::<Bouncer<T>>::from_ref(state);
        let Merged {
            instance,
            document,
            violations,
        } = bouncer.validate_and_merge(&body, operation)?;

        if !violations.is_empty() {
            return Err(AppError::Rejected(violations));
        }
        Ok(Self { instance, document })
    }
}

/// Read the whole body, failing with a deserialization violation if it
/// exceeds `limit` or the stream breaks.
async fn read_body(req: Request, limit: usize) -> Result<Bytes, AppError> {
    axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|err| {
            tracing::warn!(limit, error = %err, "failed to read request body");
            let mut violations = Violations::new();
            violations.add(
                Vec::<String>::new(),
                ViolationKind::Deserialization,
                err.to_string(),
            );
            AppError::Rejected(violations)
        })
}

//! Deferred (asynchronous) validation
//!
//! `parse_deferred` returns a placeholder immediately, without awaiting.
//! Resolving the placeholder awaits the source and validates the value
//! it produced. A source rejection propagates unchanged; it is never
//! rewritten into validation issues. The caller owns cancellation of the
//! underlying source; no timeout is imposed here.

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::schema::Schema;

use super::errors::ValidationError;

impl Schema {
    /// Starts deferred validation of an asynchronously produced value.
    ///
    /// For a `Schema::Deferred` node the eventual value is validated
    /// against the inner schema; any other node validates the value
    /// against itself.
    pub fn parse_deferred<F>(&self, source: F) -> Deferred<F> {
        let schema = match self {
            Schema::Deferred(inner) => (**inner).clone(),
            other => other.clone(),
        };
        Deferred { schema, source }
    }
}

/// Placeholder returned by [`Schema::parse_deferred`].
pub struct Deferred<F> {
    schema: Schema,
    source: F,
}

impl<F> Deferred<F>
where
    F: Future<Output = Value>,
{
    /// Awaits the source and validates the produced value.
    pub async fn resolve(self) -> Result<Value, ValidationError> {
        let value = self.source.await;
        self.schema.parse(&value)
    }
}

/// Failure of deferred validation over a fallible source.
#[derive(Debug, Error)]
pub enum DeferredError<E>
where
    E: std::error::Error + 'static,
{
    /// The source rejected; carried unchanged
    #[error("deferred source failed")]
    Source(#[source] E),
    /// The produced value did not conform
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl<F, E> Deferred<F>
where
    F: Future<Output = Result<Value, E>>,
    E: std::error::Error + 'static,
{
    /// Awaits a fallible source. A rejection is returned as
    /// [`DeferredError::Source`] without being validated.
    pub async fn try_resolve(self) -> Result<Value, DeferredError<E>> {
        let value = self.source.await.map_err(DeferredError::Source)?;
        self.schema.parse(&value).map_err(DeferredError::from)
    }
}

//! Validation subsystem
//!
//! # Design Principles
//!
//! - Every issue is collected; validation never stops at the first
//!   field failure
//! - Failures are data (issue lists); invalid input never panics
//! - Stateless: schemas are shared, results are owned by the caller
//! - Deterministic, except where a schema carries a generator default

mod deferred;
mod errors;
mod format;
mod issue;
mod validator;

pub use deferred::{Deferred, DeferredError};
pub use errors::{SafeParse, ValidateResult, ValidationError};
pub use format::humanize;
pub use issue::{path_string, Issue, IssueCode, PathSegment};

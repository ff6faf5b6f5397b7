//! Router errors.

use thiserror::Error;

/// Errors raised while building a router.
///
/// Navigation itself never fails: unmatched paths go to the not-found
/// handler and handler errors are logged at dispatch.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A route pattern did not compile.
    #[error("invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Error type route handlers return.
pub type HandlerError = anyhow::Error;

/// Result type route handlers return.
pub type HandlerResult = Result<Option<String>, HandlerError>;

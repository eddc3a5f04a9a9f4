//! Dispatch-level error type.

use thiserror::Error;

/// Errors returned by a dispatcher's `dispatch` or `refresh` method.
///
/// The engine has no retry policy of its own: every variant aborts the
/// current operation and leaves the last good snapshot in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The request never produced a response (connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The backend answered, but the body was not a cluster payload.
    #[error("could not decode cluster payload: {0}")]
    Decode(String),

    /// A per-node command named a node the backend does not know.
    #[error("unknown node '{0}'")]
    UnknownNode(String),
}

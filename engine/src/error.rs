//! Error types for the list view engine.

use crate::RecordId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteErrorKind {
    /// The target record does not exist in the authoritative set
    NotFound,
    /// Transient failure on the remote side
    ServerError,
    /// The request could not be routed or understood
    BadRequest,
}

/// A structured error returned by the remote store.
///
/// Carries an HTTP-like status code next to a human readable message.
/// The engine treats every kind the same way: a failed write is rolled back.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message} (status {status})")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub status: u16,
    pub message: String,
}

impl RemoteError {
    /// 404 for a record id the remote store does not know.
    pub fn not_found(id: &str) -> Self {
        Self {
            kind: RemoteErrorKind::NotFound,
            status: 404,
            message: format!("record not found: {id}"),
        }
    }

    /// 500 for a transient server failure.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::ServerError,
            status: 500,
            message: message.into(),
        }
    }

    /// 400 for a request the store cannot handle.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::BadRequest,
            status: 400,
            message: message.into(),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind == RemoteErrorKind::ServerError
    }
}

/// All possible errors from the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    // Record set errors
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("duplicate record id in load: {0}")]
    DuplicateRecord(RecordId),

    // Mutation errors
    #[error("a mutation is already pending for record {0}")]
    ConcurrentMutation(RecordId),

    #[error("no pending mutation matches the settled ticket for record {0}")]
    UnknownMutation(RecordId),

    // View control errors
    #[error("invalid page: {0} (pages start at 1)")]
    InvalidPage(usize),

    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),

    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::RecordNotFound("user-1".into());
        assert_eq!(err.to_string(), "record not found: user-1");

        let err = Error::ConcurrentMutation("user-1".into());
        assert_eq!(
            err.to_string(),
            "a mutation is already pending for record user-1"
        );

        let err = Error::InvalidPage(0);
        assert_eq!(err.to_string(), "invalid page: 0 (pages start at 1)");
    }

    #[test]
    fn remote_error_status_codes() {
        let err = RemoteError::not_found("abc");
        assert_eq!(err.status, 404);
        assert_eq!(err.kind, RemoteErrorKind::NotFound);
        assert!(!err.is_transient());

        let err = RemoteError::server_error("Random server error simulation");
        assert_eq!(err.status, 500);
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Random server error simulation (status 500)"
        );

        assert_eq!(RemoteError::bad_request("nope").status, 400);
    }

    #[test]
    fn remote_error_wraps_into_engine_error() {
        let err: Error = RemoteError::server_error("boom").into();
        assert_eq!(err.to_string(), "remote error: boom (status 500)");
    }
}

//! Shared error type across typespeed crates.

use thiserror::Error;

/// Stable error tags, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store unreachable at startup.
    ConnectFailure,
    /// Upstream request could not be completed.
    RequestFailed,
    /// Upstream body is not JSON.
    DecodeError,
    /// Upstream body has no `data` field.
    MissingField,
    /// Key absent from the store.
    NotFound,
    /// Store read failed.
    StoreRead,
    /// Store write failed.
    StoreWrite,
    /// Invalid configuration.
    Config,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConnectFailure => "CONNECT_FAILURE",
            ErrorKind::RequestFailed => "REQUEST_FAILED",
            ErrorKind::DecodeError => "DECODE_ERROR",
            ErrorKind::MissingField => "MISSING_FIELD",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::StoreRead => "STORE_READ",
            ErrorKind::StoreWrite => "STORE_WRITE",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TypeSpeedError>;

/// Unified error type used by core and relay.
///
/// Store read variants display the raw message only; the HTTP handler
/// returns that text verbatim as the 500 body.
#[derive(Debug, Error)]
pub enum TypeSpeedError {
    #[error("store connection failed: {0}")]
    ConnectFailure(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("decode error: {0}")]
    DecodeError(String),
    #[error("no {0} field in response")]
    MissingField(&'static str),
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    StoreRead(String),
    #[error("store write failed: {0}")]
    StoreWrite(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TypeSpeedError {
    /// Map to a stable tag.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeSpeedError::ConnectFailure(_) => ErrorKind::ConnectFailure,
            TypeSpeedError::RequestFailed(_) => ErrorKind::RequestFailed,
            TypeSpeedError::DecodeError(_) => ErrorKind::DecodeError,
            TypeSpeedError::MissingField(_) => ErrorKind::MissingField,
            TypeSpeedError::NotFound(_) => ErrorKind::NotFound,
            TypeSpeedError::StoreRead(_) => ErrorKind::StoreRead,
            TypeSpeedError::StoreWrite(_) => ErrorKind::StoreWrite,
            TypeSpeedError::Config(_) => ErrorKind::Config,
            TypeSpeedError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Upstream fetch problems: logged by the scheduler, never fatal.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RequestFailed | ErrorKind::DecodeError | ErrorKind::MissingField
        )
    }
}

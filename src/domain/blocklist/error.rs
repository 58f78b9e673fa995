use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::address::IpAddress;

/// Error type for blocklist operations
#[derive(Debug, Error)]
pub enum BlocklistError {
    #[error("Invalid IP address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: &'static str },

    #[error("{0} is not in the blocklist")]
    NotFound(IpAddress),

    #[error("The blocklist is full ({max_entries} entries); {ip} was not added")]
    Full { ip: IpAddress, max_entries: usize },

    #[error("The request deadline expired before the operation started")]
    Cancelled,

    #[error("Blocklist store failure: {0}")]
    Internal(String),
}

/// Stable, caller-visible classification of a [`BlocklistError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidAddress,
    NotFound,
    InternalError,
    Timeout,
    StorageFull,
}

impl BlocklistError {
    /// Convenience function to create an internal error. The cause is logged here
    /// and never shown to callers.
    pub fn internal<E: fmt::Display>(e: E) -> Self {
        tracing::error!("Blocklist store failure: {e}");
        BlocklistError::Internal(e.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BlocklistError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            BlocklistError::NotFound(_) => ErrorKind::NotFound,
            BlocklistError::Full { .. } => ErrorKind::StorageFull,
            BlocklistError::Cancelled => ErrorKind::Timeout,
            BlocklistError::Internal(_) => ErrorKind::InternalError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidAddress => "InvalidAddress",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::StorageFull => "StorageFull",
        };
        f.write_str(name)
    }
}

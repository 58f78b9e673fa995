use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::blocklist::{BlocklistError, ErrorKind};

const INTERNAL_ERROR_MESSAGE: &str = "The server encountered an internal error.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request body must be a JSON object with a string \"ip\" field")]
    MalformedBody,
    #[error(transparent)]
    Blocklist(#[from] BlocklistError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MalformedBody => ErrorKind::InvalidAddress,
            AppError::Blocklist(e) => e.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidAddress => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::StorageFull => StatusCode::INSUFFICIENT_STORAGE,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to the caller. Internal causes are logged where the
    /// error is created.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::InternalError => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

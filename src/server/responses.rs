use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::blocklist::ErrorKind;
use crate::server::errors::AppError;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

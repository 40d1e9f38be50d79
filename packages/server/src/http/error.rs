use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use oracle_engine::RetrievalError;
use oracle_types::ErrorResponse;
use thiserror::Error;

pub type HttpResult<T> = std::result::Result<T, HttpError>;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{0}")]
    Retrieval(#[from] RetrievalError),

    #[error("not found")]
    NotFound,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Retrieval(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(&self))).into_response()
    }
}

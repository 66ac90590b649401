use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::utils::helpers::service_name;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Unauthenticated: {0}")]
    UnauthenticatedError(String),

    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Comment Not Found: {0}")]
    CommentNotFoundError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Already Liked: {0}")]
    AlreadyLikedError(String),

    #[error("Not Liked: {0}")]
    NotLikedError(String),

    #[error("Storage Error: {0}")]
    StorageError(String),
}

impl CustomError {
    /// Machine-readable code carried in the `error` field of the response body.
    pub fn code(&self) -> &'static str {
        match *self {
            CustomError::UnauthenticatedError(..) => "UNAUTHENTICATED_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::CommentNotFoundError(..) => "COMMENT_NOT_FOUND_ERROR",
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::AlreadyLikedError(..) => "ALREADY_LIKED_ERROR",
            CustomError::NotLikedError(..) => "NOT_LIKED_ERROR",
            CustomError::StorageError(..) => "STORAGE_ERROR",
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::UnauthenticatedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::ForbiddenError(..) => StatusCode::BAD_REQUEST,
            CustomError::NotFoundError(..) => StatusCode::BAD_REQUEST,
            CustomError::CommentNotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::AlreadyLikedError(..) => StatusCode::BAD_REQUEST,
            CustomError::NotLikedError(..) => StatusCode::BAD_REQUEST,
            CustomError::StorageError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.code(),
            "service": service_name(),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}

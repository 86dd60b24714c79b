use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::responses::JsonResponse;

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("the {0} already exists")]
    Conflict(String),
    #[error("user not found")]
    NotFound,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for UserServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserServiceError::NotFound,
            other => UserServiceError::Database(other),
        }
    }
}

impl From<password_hash::Error> for UserServiceError {
    fn from(err: password_hash::Error) -> Self {
        UserServiceError::PasswordHash(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid verification code")]
    InvalidCode,
    #[error("Verification code has expired")]
    CodeExpired,
    #[error("Account is already verified")]
    AlreadyVerified,
    #[error("token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    User(#[from] UserServiceError),
}

impl From<password_hash::Error> for AuthError {
    fn from(err: password_hash::Error) -> Self {
        AuthError::PasswordHash(err.to_string())
    }
}

impl IntoResponse for UserServiceError {
    fn into_response(self) -> Response {
        match &self {
            UserServiceError::Conflict(_) => JsonResponse::conflict(&self.to_string()).into_response(),
            UserServiceError::NotFound => JsonResponse::not_found("User not found").into_response(),
            UserServiceError::PasswordHash(_) | UserServiceError::Database(_) => {
                tracing::error!(err = %self, "user service failure");
                JsonResponse::server_error("Internal server error").into_response()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                JsonResponse::unauthorized(&self.to_string()).into_response()
            }
            AuthError::InvalidCode | AuthError::CodeExpired | AuthError::AlreadyVerified => {
                JsonResponse::bad_request(&self.to_string()).into_response()
            }
            AuthError::Jwt(_) | AuthError::PasswordHash(_) => {
                tracing::error!(err = %self, "auth service failure");
                JsonResponse::server_error("Internal server error").into_response()
            }
            AuthError::User(inner) => inner.into_response(),
        }
    }
}

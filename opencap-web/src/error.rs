//! HTTP error bodies
//!
//! Wraps `CoreError` and maps it onto `{code, message}` responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use opencap_core::error::{AuthError, CoreError, ResolverError};

use crate::messages::ErrorBody;

/// Boundary error: a `CoreError` on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_expected() {
            log::warn!("ApiError: {err}");
        } else {
            log::error!("ApiError: {err}");
        }
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        CoreError::from(err).into()
    }
}

impl ApiError {
    /// 400 with a caller-facing message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        CoreError::ValidationError(message.into()).into()
    }

    /// Text sent to the client. Server faults get a generic message.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.0 {
            CoreError::Address(e) => e.to_string(),
            CoreError::Auth(AuthError::MalformedHeader) => "Bad auth header".to_string(),
            CoreError::Auth(AuthError::Unauthorized(msg)) | CoreError::ValidationError(msg) => {
                msg.clone()
            }
            CoreError::Auth(e) => e.to_string(),
            CoreError::UserNotFound(_) => "User not found".to_string(),
            CoreError::AddressNotFound(_) => "Address not found".to_string(),
            CoreError::DomainNotFound(_) => "Domain not found".to_string(),
            CoreError::Duplicate(_) => "User already exists".to_string(),
            CoreError::InvalidCredentials(_) => "Incorrect password".to_string(),
            CoreError::Resolution(ResolverError::ValidationError(msg)) => msg.clone(),
            CoreError::Resolution(_) => "Domain resolution failed".to_string(),
            CoreError::StorageError(_) => "Database error".to_string(),
            CoreError::SerializationError(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            CoreError::Address(_)
            | CoreError::ValidationError(_)
            | CoreError::Auth(AuthError::MalformedHeader)
            | CoreError::Resolution(ResolverError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            CoreError::Auth(_) | CoreError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            CoreError::UserNotFound(_)
            | CoreError::AddressNotFound(_)
            | CoreError::DomainNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Duplicate(_) => StatusCode::CONFLICT,
            CoreError::Resolution(_)
            | CoreError::StorageError(_)
            | CoreError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody::new(status, self.message()))
    }
}

/// Fallback for every unmatched route or method.
#[allow(clippy::unused_async)]
pub async fn not_implemented() -> HttpResponse {
    HttpResponse::NotImplemented().json(ErrorBody::new(
        StatusCode::NOT_IMPLEMENTED,
        "Method not implemented",
    ))
}

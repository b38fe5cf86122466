//! Authorization gate as an extractor
//!
//! Handlers that take [`Authorized`] first only run once the bearer token
//! validates and names the `{domain}`/`{username}` of the request path.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use opencap_core::error::CoreError;
use opencap_core::types::Principal;

use crate::error::ApiError;
use crate::WebState;

/// Identity proven by the request's bearer token.
#[derive(Debug, Clone)]
pub struct Authorized(pub Principal);

impl FromRequest for Authorized {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<Authorized, ApiError> {
    let state = req.app_data::<web::Data<WebState>>().ok_or_else(|| {
        CoreError::SerializationError("Application state is not registered".to_string())
    })?;

    // Non-ASCII header values count as malformed
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let domain = req.match_info().get("domain").unwrap_or_default();
    let username = req.match_info().get("username").unwrap_or_default();

    let principal = state.app.gate.guard(header, domain, username, Utc::now())?;
    Ok(Authorized(principal))
}

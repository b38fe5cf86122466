use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::messages::{LoginRequest, LoginResponse};
use crate::WebState;

/// Exchange a password for a bearer token.
pub async fn login(
    state: web::Data<WebState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest {
        username,
        domain,
        password,
    } = body.into_inner();
    let jwt = state
        .app
        .account_service
        .login(&domain, &username, &password)
        .await?;

    state.json(&LoginResponse { jwt })
}

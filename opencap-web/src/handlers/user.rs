use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::gate::Authorized;
use crate::messages::CreateUserRequest;
use crate::WebState;

/// Register a user under the path domain; no authentication.
pub async fn create_user(
    state: web::Data<WebState>,
    path: web::Path<String>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let domain = path.into_inner();
    let CreateUserRequest { username, password } = body.into_inner();
    state
        .app
        .account_service
        .create_user(&domain, &username, &password)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

/// Remove a user and every address they own.
pub async fn delete_user(
    _auth: Authorized,
    state: web::Data<WebState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (domain, username) = path.into_inner();
    state
        .app
        .account_service
        .delete_user(&domain, &username)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

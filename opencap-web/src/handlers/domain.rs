use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::messages::{AssociateDomainRequest, AssociateDomainResponse, DomainResponse};
use crate::WebState;

/// Re-resolve a domain and refresh its stored public key.
pub async fn associate(
    state: web::Data<WebState>,
    body: web::Json<AssociateDomainRequest>,
) -> Result<HttpResponse, ApiError> {
    let advertisement = state
        .app
        .domain_service
        .associate(&body.domain)
        .await?;

    state.json(&AssociateDomainResponse::from(&advertisement))
}

pub async fn get_domain(
    state: web::Data<WebState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let domain = path.into_inner();
    let key = state.app.domain_service.public_key(&domain).await?;

    state.json(&DomainResponse {
        domain,
        public_key: hex::encode(key),
    })
}

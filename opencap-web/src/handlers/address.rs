use actix_web::{web, HttpResponse};
use base64::prelude::*;
use opencap_core::types::AddressTypeId;

use crate::error::ApiError;
use crate::gate::Authorized;
use crate::messages::{AliasAddressResponse, AliasQuery, LookupResponse, UpdateAddressRequest};
use crate::WebState;

type AddressPath = web::Path<(String, String, AddressTypeId)>;

/// Look up one address; no authentication.
pub async fn lookup(state: web::Data<WebState>, path: AddressPath) -> Result<HttpResponse, ApiError> {
    let (domain, username, address_type) = path.into_inner();
    let record = state
        .app
        .address_service
        .lookup(&domain, &username, address_type)
        .await?;

    state.json(&LookupResponse::from(&record))
}

/// Resolve `?alias=user$domain[&address_type=N]`.
pub async fn lookup_alias(
    state: web::Data<WebState>,
    query: web::Query<AliasQuery>,
) -> Result<HttpResponse, ApiError> {
    let AliasQuery {
        alias,
        address_type,
    } = query.into_inner();
    let records = state
        .app
        .address_service
        .lookup_alias(&alias, address_type)
        .await?;

    match (address_type, records.first()) {
        (Some(_), Some(record)) => state.json(&LookupResponse::from(record)),
        _ => {
            let body: Vec<AliasAddressResponse> =
                records.iter().map(AliasAddressResponse::from).collect();
            state.json(&body)
        }
    }
}

/// Create or replace an address.
pub async fn update(
    _auth: Authorized,
    state: web::Data<WebState>,
    path: AddressPath,
    body: web::Json<UpdateAddressRequest>,
) -> Result<HttpResponse, ApiError> {
    let (domain, username, address_type) = path.into_inner();
    let UpdateAddressRequest { sub_type, address } = body.into_inner();
    let payload = BASE64_STANDARD
        .decode(address.as_bytes())
        .map_err(|_| ApiError::bad_request("Address must be valid base64"))?;

    state
        .app
        .address_service
        .update(&domain, &username, address_type, sub_type, payload)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

pub async fn delete(
    _auth: Authorized,
    state: web::Data<WebState>,
    path: AddressPath,
) -> Result<HttpResponse, ApiError> {
    let (domain, username, address_type) = path.into_inner();
    state
        .app
        .address_service
        .delete(&domain, &username, address_type)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

//! OpenCAP HTTP surface
//!
//! Routes live under `/v1`; anything unmatched answers 501.

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod logging;
pub mod messages;
pub mod server;

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use opencap_app::AppState;
use opencap_core::error::CoreError;
use serde::Serialize;

use crate::error::{not_implemented, ApiError};
use crate::handlers::{address, auth, domain, user};

/// Largest accepted JSON request body.
pub const JSON_LIMIT: usize = 16 * 1024;

/// State registered as `web::Data` on every worker.
pub struct WebState {
    pub app: AppState,
    /// Pretty-print JSON response bodies
    pub pretty_json: bool,
}

impl WebState {
    #[must_use]
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            pretty_json: false,
        }
    }

    #[must_use]
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    /// 200 with `body` serialized per the configured style.
    pub fn json<T: Serialize>(&self, body: &T) -> Result<HttpResponse, ApiError> {
        let encoded = if self.pretty_json {
            serde_json::to_string_pretty(body)
        } else {
            serde_json::to_string(body)
        }
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(encoded))
    }
}

/// Register the `/v1` routes and extractor error handlers.
///
/// JSON bodies are parsed whatever their `Content-Type`.
///
/// The caller still sets `default_service(web::to(error::not_implemented))`
/// on the `App` for paths outside `/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .content_type_required(false)
            .error_handler(|_err, _req| ApiError::bad_request("Failed to decode json").into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ApiError::bad_request("Invalid path parameter").into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|_err, _req| ApiError::bad_request("Invalid query parameter").into()),
    )
    .service(
        web::scope("/v1")
            .service(resource("/auth").route(web::post().to(auth::login)))
            .service(resource("/addresses").route(web::get().to(address::lookup_alias)))
            .service(resource("/domains").route(web::post().to(domain::associate)))
            .service(resource("/domains/{domain}").route(web::get().to(domain::get_domain)))
            .service(resource("/domains/{domain}/users").route(web::post().to(user::create_user)))
            .service(
                resource("/domains/{domain}/users/{username}")
                    .route(web::delete().to(user::delete_user)),
            )
            .service(
                resource("/domains/{domain}/users/{username}/types/{address_type}")
                    .route(web::get().to(address::lookup))
                    .route(web::put().to(address::update))
                    .route(web::delete().to(address::delete)),
            )
            .default_service(web::to(not_implemented)),
    );
}

/// A resource whose unsupported methods answer 501 rather than 405.
fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(not_implemented))
}

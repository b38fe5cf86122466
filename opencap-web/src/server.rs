//! Startup: adapters, application state, HTTP server

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use opencap_app::adapters::open_registry;
use opencap_app::AppStateBuilder;
use opencap_core::auth::TokenService;
use opencap_resolver::OpencapResolver;

use crate::config::Config;
use crate::error::not_implemented;
use crate::{configure, WebState};

/// Seconds in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Build the shared state from configuration.
pub async fn build_state(config: &Config) -> anyhow::Result<WebState> {
    let registry = open_registry(&config.database.url)
        .await
        .context("Failed to open address registry")?;
    tracing::info!("Address registry opened");

    let resolver = OpencapResolver::with_nameserver(config.resolver.nameserver, config.resolver.keys());

    let tokens = TokenService::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.algorithm,
        chrono::Duration::seconds(config.auth.token_ttl_secs),
    )
    .context("Failed to configure token service")?;

    let app = AppStateBuilder::new()
        .registry(registry)
        .resolver(Arc::new(resolver))
        .token_service(Arc::new(tokens))
        .resolve_timeout(Duration::from_secs(config.resolver.timeout_secs))
        .build()
        .context("Failed to build application state")?;

    Ok(WebState::new(app).with_pretty_json(config.server.debug))
}

/// Serve until SIGINT/SIGTERM, then drain.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = web::Data::new(build_state(&config).await?);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .default_service(web::to(not_implemented))
    })
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS);

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let server = server
        .bind((config.server.host.as_str(), config.server.port))
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tracing::info!(
        "OpenCAP server listening on {}:{}",
        config.server.host,
        config.server.port
    );
    server.run().await.context("HTTP server failed")?;
    tracing::info!("OpenCAP server stopped");
    Ok(())
}

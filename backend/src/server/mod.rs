//! Server construction and wiring.
//!
//! Builds the connection pool, the outbound adapters, and the workflow
//! services, then runs the actix server with session middleware on the
//! `/api/v1` scope and plain health probes outside it.

pub mod config;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};

use crate::domain::{ExportService, SignupService, VoucherService};
use crate::inbound::http::export::{admin_login, export_users};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::locations::list_locations;
use crate::inbound::http::signup::create_account;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::vouchers::issue_voucher;
use crate::outbound::locations::LocationHttpSource;
use crate::outbound::persistence::{
    DbPool, DieselDigitalCoinRepository, DieselSignupRepository, DieselUserExportRepository,
    PoolConfig,
};
use crate::outbound::uploads::UploadHttpStore;

/// Read the session cookie signing key from disk.
///
/// Release builds refuse to start without the key file; debug builds fall
/// back to an ephemeral key so local runs need no secret provisioning.
pub fn load_session_key(path: &Path) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) if cfg!(debug_assertions) => {
            warn!(path = %path.display(), error = %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(std::io::Error::other(format!(
            "failed to read session key at {}: {error}",
            path.display()
        ))),
    }
}

/// Wire the real adapters into the HTTP handler state.
pub async fn build_http_state(config: &AppConfig) -> std::io::Result<HttpState> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;

    let locations =
        LocationHttpSource::new(config.locations_api_url.clone()).map_err(std::io::Error::other)?;
    let uploads =
        UploadHttpStore::new(config.uploads_api_url.clone()).map_err(std::io::Error::other)?;

    let signup = SignupService::new(Arc::new(DieselSignupRepository::new(pool.clone())));
    let vouchers = VoucherService::new(
        Arc::new(DieselDigitalCoinRepository::new(pool.clone())),
        Arc::new(uploads),
    );
    let exports = ExportService::new(Arc::new(DieselUserExportRepository::new(pool)));

    Ok(HttpState::new(
        Arc::new(signup),
        Arc::new(vouchers),
        Arc::new(exports),
        Arc::new(locations),
        config.export_password.as_str(),
    ))
}

/// Run the HTTP server until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let key = load_session_key(&config.session_key_file)?;
    let http_state = web::Data::new(build_http_state(&config).await?);
    let health_state = web::Data::new(HealthState::new());

    let server_health_state = health_state.clone();
    let cookie_secure = config.cookie_secure;
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(create_account)
                    .service(issue_voucher)
                    .service(list_locations)
                    .service(admin_login)
                    .service(export_users),
            )
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "server listening");
    server.run().await
}

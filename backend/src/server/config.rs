//! Application configuration parsed from flags and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Runtime configuration for the backend server.
///
/// Every flag has an environment-variable fallback so container deployments
/// can configure the process without a command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "tugza-backend", about = "Signup and voucher backend server")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// File holding the session cookie signing key.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    pub session_key_file: PathBuf,

    /// Whether session cookies are marked `Secure`.
    #[arg(
        long,
        env = "SESSION_COOKIE_SECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub cookie_secure: bool,

    /// Shared secret gating the admin export endpoints.
    #[arg(long, env = "EXPORT_PASSWORD")]
    pub export_password: String,

    /// Endpoint of the external location API.
    #[arg(long, env = "LOCATIONS_API_URL")]
    pub locations_api_url: Url,

    /// Endpoint of the external photo upload API.
    #[arg(long, env = "UPLOADS_API_URL")]
    pub uploads_api_url: Url,
}

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountSignup, FixtureAccountSignup, FixtureLocationSource, FixtureUsersExport,
    FixtureVoucherIssuer, LocationSource, UsersExport, VoucherIssuer,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub signup: Arc<dyn AccountSignup>,
    pub vouchers: Arc<dyn VoucherIssuer>,
    pub exports: Arc<dyn UsersExport>,
    pub locations: Arc<dyn LocationSource>,
    /// Shared secret gating the admin export endpoints.
    pub export_password: Arc<str>,
}

impl HttpState {
    /// Construct state from port implementations and the export secret.
    pub fn new(
        signup: Arc<dyn AccountSignup>,
        vouchers: Arc<dyn VoucherIssuer>,
        exports: Arc<dyn UsersExport>,
        locations: Arc<dyn LocationSource>,
        export_password: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            signup,
            vouchers,
            exports,
            locations,
            export_password: export_password.into(),
        }
    }

    /// State backed entirely by fixture ports, for handler tests.
    pub fn fixture(export_password: &str) -> Self {
        Self::new(
            Arc::new(FixtureAccountSignup),
            Arc::new(FixtureVoucherIssuer),
            Arc::new(FixtureUsersExport),
            Arc::new(FixtureLocationSource),
            export_password,
        )
    }
}

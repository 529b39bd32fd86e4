//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as marking or checking an admin login.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;

pub(crate) const ADMIN_KEY: &str = "admin";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Mark the session as an authenticated admin.
    pub fn persist_admin(&self) -> Result<(), Error> {
        self.0
            .insert(ADMIN_KEY, true)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Whether the session carries an admin login.
    pub fn is_admin(&self) -> Result<bool, Error> {
        self.0
            .get::<bool>(ADMIN_KEY)
            .map(|flag| flag.unwrap_or(false))
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require an admin session or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin()? {
            Ok(())
        } else {
            Err(Error::unauthorized("admin login required"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

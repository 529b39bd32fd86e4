//! Account-signup workflow service.
//!
//! Validates the submission before any side effect, then persists the user
//! and account pair through the transactional repository port. Persistence
//! failures are logged at this boundary and surfaced generically.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::account::NewUser;
use super::error::Error;
use super::forms::SignupForm;
use super::ports::{AccountSignup, SignupPersistenceError, SignupRepository};

fn map_persistence_error(error: SignupPersistenceError) -> Error {
    match error {
        SignupPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("signup store unavailable: {message}"))
        }
        SignupPersistenceError::Write { message } => {
            Error::internal(format!("signup write failed: {message}"))
        }
    }
}

/// Signup service implementing the [`AccountSignup`] driving port.
#[derive(Clone)]
pub struct SignupService<R> {
    repo: Arc<R>,
}

impl<R> SignupService<R> {
    /// Create a new service with the signup repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> AccountSignup for SignupService<R>
where
    R: SignupRepository,
{
    async fn create_account(&self, form: SignupForm) -> Result<(), Error> {
        form.validate()?;

        let account_type = form.account_type.unwrap_or_default();
        let user = NewUser {
            name: form.name,
            email: form.email,
            phone: form.phone,
            city: form.city,
            address: form.address,
            bank: form.bank,
        };

        let ids = self
            .repo
            .create_user_with_account(&user, account_type)
            .await
            .map_err(|err| {
                error!(error = %err, "account signup persistence failed");
                map_persistence_error(err)
            })?;

        info!(
            user_id = %ids.user_id,
            account_id = %ids.account_id,
            account_type = account_type.as_str(),
            "account created"
        );
        Ok(())
    }
}

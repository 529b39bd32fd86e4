//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the workflows reach storage and external
//! collaborators (the relational store, the location API, the photo upload
//! store). Driving ports are the use-cases the HTTP adapter consumes. Each
//! driven trait exposes a dedicated `thiserror` enum so adapters map their
//! failures into predictable variants.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use super::account::{AccountType, NewUser, SignupRowIds, UserRecord};
use super::error::Error;
use super::forms::{ExistingVoucherForm, NewVoucherForm, SignupForm};
use super::voucher::{DigitalCoin, NewDigitalCoin, PhotoUpload, VoucherReceipt};

/// Persistence errors raised by [`SignupRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SignupPersistenceError {
    /// Database connectivity failure.
    #[error("signup store connection failed: {message}")]
    Connection { message: String },
    /// The transactional user+account write failed.
    #[error("signup write failed: {message}")]
    Write { message: String },
}

impl SignupPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write { message: message.into() }
    }
}

/// Persistence errors raised by [`DigitalCoinRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum VoucherPersistenceError {
    /// Database connectivity failure.
    #[error("voucher store connection failed: {message}")]
    Connection { message: String },
    /// Insert or query failed.
    #[error("voucher store operation failed: {message}")]
    Write { message: String },
    /// The generated coin token already exists; the caller should retry
    /// with a fresh token.
    #[error("coin token already exists")]
    TokenConflict,
}

impl VoucherPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write { message: message.into() }
    }
}

/// Persistence errors raised by [`UserExportRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ExportPersistenceError {
    /// Database connectivity failure.
    #[error("export query connection failed: {message}")]
    Connection { message: String },
    /// The read query failed.
    #[error("export query failed: {message}")]
    Query { message: String },
}

impl ExportPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query { message: message.into() }
    }
}

/// Failures surfaced by the location lookup adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LocationSourceError {
    /// The lookup did not complete within the configured timeout.
    #[error("location lookup timed out: {message}")]
    Timeout { message: String },
    /// Connection-level failure reaching the location API.
    #[error("location lookup transport failure: {message}")]
    Transport { message: String },
    /// The API answered with a non-success status.
    #[error("location API returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    /// The response body could not be decoded.
    #[error("location response decode failure: {message}")]
    Decode { message: String },
}

impl LocationSourceError {
    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout { message: message.into() }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Helper for non-success upstream statuses.
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamStatus { status, message: message.into() }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }
}

/// Failures surfaced by the photo upload adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PhotoStoreError {
    /// Connection-level failure reaching the upload API, after retries.
    #[error("photo upload transport failure: {message}")]
    Transport { message: String },
    /// The upload API answered with a non-success status, after retries.
    #[error("photo upload returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    /// The response body did not carry the expected `{ url }` payload.
    #[error("photo upload response decode failure: {message}")]
    Decode { message: String },
}

impl PhotoStoreError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Helper for non-success upstream statuses.
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamStatus { status, message: message.into() }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }
}

/// One country, state, or city entry from the location API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocationEntry {
    /// Upstream identifier (stringified; the API mixes numbers and strings).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Persistence port for the signup workflow.
///
/// The user and account inserts run inside one database transaction; a
/// failure of either write leaves no row behind.
#[async_trait]
pub trait SignupRepository: Send + Sync {
    /// Create one user row and one account row referencing it.
    async fn create_user_with_account(
        &self,
        user: &NewUser,
        account_type: AccountType,
    ) -> Result<SignupRowIds, SignupPersistenceError>;
}

/// Persistence port for voucher rows.
#[async_trait]
pub trait DigitalCoinRepository: Send + Sync {
    /// Insert a voucher row. Fails with
    /// [`VoucherPersistenceError::TokenConflict`] when the token is taken.
    async fn insert(&self, coin: &NewDigitalCoin) -> Result<(), VoucherPersistenceError>;

    /// The most recent voucher registered under `phone`, if any.
    async fn find_latest_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<DigitalCoin>, VoucherPersistenceError>;
}

/// Read-only port for the export workflow.
#[async_trait]
pub trait UserExportRepository: Send + Sync {
    /// User rows whose city and bank affiliation both match exactly.
    async fn find_by_city_and_bank(
        &self,
        city: &str,
        bank: &str,
    ) -> Result<Vec<UserRecord>, ExportPersistenceError>;
}

/// Lookup port for the external location API.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// All known countries.
    async fn list_countries(&self) -> Result<Vec<LocationEntry>, LocationSourceError>;

    /// States of one country.
    async fn list_states(
        &self,
        country_id: &str,
    ) -> Result<Vec<LocationEntry>, LocationSourceError>;

    /// Cities of one state.
    async fn list_cities(
        &self,
        country_id: &str,
        state_id: &str,
    ) -> Result<Vec<LocationEntry>, LocationSourceError>;
}

/// Port for the external photo upload store.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Upload the photo into `folder` and return its public URL.
    async fn store(&self, photo: &PhotoUpload, folder: &str) -> Result<String, PhotoStoreError>;
}

/// A voucher issuance request, tagged by requester kind.
#[derive(Debug, Clone, PartialEq)]
pub enum VoucherRequest {
    /// First-time participant: full details, optional ID photo.
    NewUser(NewVoucherForm),
    /// Previously registered participant: phone and amount only.
    ExistingUser(ExistingVoucherForm),
}

/// Driving port: account signup use-case.
#[async_trait]
pub trait AccountSignup: Send + Sync {
    /// Validate the form and persist the user and account pair.
    async fn create_account(&self, form: SignupForm) -> Result<(), Error>;
}

/// Driving port: voucher issuance use-case.
#[async_trait]
pub trait VoucherIssuer: Send + Sync {
    /// Validate, branch on requester kind, and persist one voucher row.
    async fn issue(&self, request: VoucherRequest) -> Result<VoucherReceipt, Error>;
}

/// Driving port: user export use-case.
#[async_trait]
pub trait UsersExport: Send + Sync {
    /// All user records matching the city and bank filters exactly.
    async fn export_users(&self, city: &str, bank: &str) -> Result<Vec<UserRecord>, Error>;
}

/// Fixture [`AccountSignup`] that validates and then discards the form.
pub struct FixtureAccountSignup;

#[async_trait]
impl AccountSignup for FixtureAccountSignup {
    async fn create_account(&self, form: SignupForm) -> Result<(), Error> {
        form.validate()
    }
}

/// Fixture [`VoucherIssuer`] returning a canned receipt.
pub struct FixtureVoucherIssuer;

#[async_trait]
impl VoucherIssuer for FixtureVoucherIssuer {
    async fn issue(&self, request: VoucherRequest) -> Result<VoucherReceipt, Error> {
        let amount = match &request {
            VoucherRequest::NewUser(form) => {
                form.validate()?;
                form.amount
            }
            VoucherRequest::ExistingUser(form) => {
                form.validate()?;
                form.amount
            }
        };
        Ok(VoucherReceipt {
            amount,
            coin_token: "100000000000000".to_owned(),
        })
    }
}

/// Fixture [`UsersExport`] returning one canned record.
pub struct FixtureUsersExport;

#[async_trait]
impl UsersExport for FixtureUsersExport {
    async fn export_users(&self, city: &str, bank: &str) -> Result<Vec<UserRecord>, Error> {
        Ok(vec![UserRecord {
            id: uuid::Uuid::nil(),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "0911000000".to_owned(),
            city: city.to_owned(),
            address: "1 Analytical Way".to_owned(),
            bank: Some(bank.to_owned()),
        }])
    }
}

/// Fixture [`LocationSource`] serving a tiny in-memory hierarchy.
pub struct FixtureLocationSource;

fn entry(id: &str, name: &str) -> LocationEntry {
    LocationEntry { id: id.to_owned(), name: name.to_owned() }
}

#[async_trait]
impl LocationSource for FixtureLocationSource {
    async fn list_countries(&self) -> Result<Vec<LocationEntry>, LocationSourceError> {
        Ok(vec![entry("1", "Ethiopia")])
    }

    async fn list_states(
        &self,
        country_id: &str,
    ) -> Result<Vec<LocationEntry>, LocationSourceError> {
        match country_id {
            "1" => Ok(vec![entry("11", "Oromia"), entry("12", "Addis Ababa")]),
            _ => Ok(Vec::new()),
        }
    }

    async fn list_cities(
        &self,
        country_id: &str,
        state_id: &str,
    ) -> Result<Vec<LocationEntry>, LocationSourceError> {
        match (country_id, state_id) {
            ("1", "11") => Ok(vec![entry("111", "Adama")]),
            ("1", "12") => Ok(vec![entry("121", "Addis Ababa")]),
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixture_location_source_cascades() {
        actix_rt::System::new().block_on(async {
            let source = FixtureLocationSource;
            let countries = source.list_countries().await.expect("countries");
            assert_eq!(countries.len(), 1);
            let states = source.list_states("1").await.expect("states");
            assert_eq!(states.len(), 2);
            let cities = source.list_cities("1", "11").await.expect("cities");
            assert_eq!(cities[0].name, "Adama");
            let none = source.list_cities("9", "9").await.expect("empty");
            assert!(none.is_empty());
        });
    }

    #[rstest]
    fn persistence_error_helpers_carry_messages() {
        let err = SignupPersistenceError::connection("refused");
        assert!(err.to_string().contains("refused"));
        let err = VoucherPersistenceError::write("constraint");
        assert!(err.to_string().contains("constraint"));
        let err = ExportPersistenceError::query("syntax");
        assert!(err.to_string().contains("syntax"));
    }

    #[rstest]
    fn upstream_error_helpers_carry_status() {
        let err = LocationSourceError::upstream_status(503, "unavailable");
        assert!(err.to_string().contains("503"));
        let err = PhotoStoreError::upstream_status(500, "boom");
        assert!(err.to_string().contains("500"));
    }
}

//! Domain layer: entities, validation, workflow services, and the ports
//! that bound them.
//!
//! Everything here is adapter-agnostic. The HTTP layer drives the services
//! through the traits in [`ports`]; storage and external collaborators plug
//! in behind the driven traits.

pub mod account;
pub mod error;
pub mod export_service;
pub mod forms;
pub mod ports;
pub mod signup_service;
pub mod voucher;
pub mod voucher_service;

pub use self::account::{AccountType, NewUser, SignupRowIds, UserRecord};
pub use self::error::{Error, ErrorCode};
pub use self::export_service::ExportService;
pub use self::forms::{ExistingVoucherForm, FieldErrors, NewVoucherForm, SignupForm};
pub use self::ports::{
    AccountSignup, DigitalCoinRepository, ExportPersistenceError, LocationEntry, LocationSource,
    LocationSourceError, PhotoStore, PhotoStoreError, SignupPersistenceError, SignupRepository,
    UserExportRepository, UsersExport, VoucherIssuer, VoucherPersistenceError, VoucherRequest,
};
pub use self::signup_service::SignupService;
pub use self::voucher::{
    CoinToken, Denomination, DigitalCoin, NewDigitalCoin, PhotoUpload, VoucherReceipt,
};
pub use self::voucher_service::VoucherService;

//! Digital-money voucher aggregates.
//!
//! A voucher ("digital coin") is identified by a randomly generated 15-digit
//! numeric token. The token is not cryptographically secure; uniqueness is
//! enforced by the storage layer, and the issuing service regenerates on
//! conflict.

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Inclusive lower bound of a coin token's numeric value.
pub const COIN_TOKEN_MIN: u64 = 100_000_000_000_000;
/// Inclusive upper bound of a coin token's numeric value.
pub const COIN_TOKEN_MAX: u64 = 999_999_999_999_999;

/// Maximum accepted ID photo size in bytes.
pub const MAX_PHOTO_BYTES: usize = 5_000_000;
/// MIME types accepted for the optional ID photo.
pub const ALLOWED_PHOTO_MIME: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// The closed set of voucher denominations.
pub const DENOMINATIONS: [u32; 11] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

/// A 15-digit numeric voucher token.
///
/// # Examples
/// ```
/// use tugza_backend::domain::CoinToken;
///
/// let token = CoinToken::parse("100000000000000").expect("valid token");
/// assert_eq!(token.as_str().len(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoinToken(String);

/// Parse failures for [`CoinToken`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CoinTokenParseError {
    /// The value is not exactly 15 ASCII digits.
    #[error("coin token must be exactly 15 digits")]
    Malformed,
    /// The value parses as digits but falls outside the token range.
    #[error("coin token out of range")]
    OutOfRange,
}

impl CoinToken {
    /// Generate a uniformly random token in `[COIN_TOKEN_MIN, COIN_TOKEN_MAX]`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let value = rng.gen_range(COIN_TOKEN_MIN..=COIN_TOKEN_MAX);
        Self(value.to_string())
    }

    /// Validate a raw string as a coin token.
    pub fn parse(raw: &str) -> Result<Self, CoinTokenParseError> {
        if raw.len() != 15 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoinTokenParseError::Malformed);
        }
        let value: u64 = raw.parse().map_err(|_| CoinTokenParseError::Malformed)?;
        if !(COIN_TOKEN_MIN..=COIN_TOKEN_MAX).contains(&value) {
            return Err(CoinTokenParseError::OutOfRange);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the token digits.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CoinToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voucher amount restricted to the fixed denomination set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denomination(u32);

/// Rejection raised for amounts outside the denomination set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("amount must be one of the fixed denominations")]
pub struct DenominationError;

impl Denomination {
    /// Accept an amount only when it is a member of [`DENOMINATIONS`].
    ///
    /// # Examples
    /// ```
    /// use tugza_backend::domain::Denomination;
    ///
    /// assert!(Denomination::new(500).is_ok());
    /// assert!(Denomination::new(42).is_err());
    /// ```
    pub fn new(amount: u32) -> Result<Self, DenominationError> {
        if DENOMINATIONS.contains(&amount) {
            Ok(Self(amount))
        } else {
            Err(DenominationError)
        }
    }

    /// The numeric amount.
    pub fn value(self) -> u32 {
        self.0
    }
}

/// An uploaded ID photo, held in memory until the upload collaborator
/// returns a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Original file name, when the client supplied one.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Fields persisted for one voucher issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDigitalCoin {
    /// Primary key of the new row.
    pub id: Uuid,
    /// Requester name (copied from the prior row for existing users).
    pub name: String,
    /// Selected country name.
    pub country: String,
    /// Selected state name.
    pub state: String,
    /// Selected city name.
    pub city: String,
    /// Voucher amount.
    pub amount: Denomination,
    /// Phone number of the requester.
    pub generator_phone_number: String,
    /// URL of the uploaded ID photo, when one was supplied.
    pub id_photo_url: Option<String>,
    /// The freshly generated claim token.
    pub coin_token: CoinToken,
}

/// A persisted voucher row as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalCoin {
    /// Primary key.
    pub id: Uuid,
    /// Requester name.
    pub name: String,
    /// Country name.
    pub country: String,
    /// State name.
    pub state: String,
    /// City name.
    pub city: String,
    /// Voucher amount.
    pub amount: Denomination,
    /// Phone number of the requester.
    pub generator_phone_number: String,
    /// URL of the uploaded ID photo, when one was supplied.
    pub id_photo_url: Option<String>,
    /// The claim token issued with this row.
    pub coin_token: CoinToken,
    /// Row creation timestamp; orders "most recent prior voucher" lookups.
    pub created_at: DateTime<Utc>,
}

/// Receipt returned to the requester after a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherReceipt {
    /// The issued amount.
    pub amount: u32,
    /// The claim token, displayed to the user as their receipt.
    pub coin_token: String,
}

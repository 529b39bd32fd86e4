//! PostgreSQL-backed `DigitalCoinRepository` implementation using Diesel ORM.
//!
//! The `coin_token` column carries a unique constraint; a violation of that
//! constraint is surfaced as [`VoucherPersistenceError::TokenConflict`] so
//! the issuing service can retry with a fresh token.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{DigitalCoinRepository, VoucherPersistenceError};
use crate::domain::voucher::{CoinToken, Denomination, DigitalCoin, NewDigitalCoin};

use super::models::{DigitalCoinRow, NewDigitalCoinRow};
use super::pool::{DbPool, PoolError};
use super::schema::digital_coins;

/// Diesel-backed implementation of the [`DigitalCoinRepository`] port.
#[derive(Clone)]
pub struct DieselDigitalCoinRepository {
    pool: DbPool,
}

impl DieselDigitalCoinRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VoucherPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            VoucherPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> VoucherPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "voucher store operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name().is_some_and(|name| name.contains("coin_token")) =>
        {
            VoucherPersistenceError::TokenConflict
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            VoucherPersistenceError::connection("database connection error")
        }
        other => VoucherPersistenceError::write(other.to_string()),
    }
}

fn row_to_coin(row: DigitalCoinRow) -> Result<DigitalCoin, VoucherPersistenceError> {
    let amount = u32::try_from(row.amount)
        .ok()
        .and_then(|value| Denomination::new(value).ok())
        .ok_or_else(|| {
            VoucherPersistenceError::write(format!(
                "stored amount {} outside the denomination set",
                row.amount
            ))
        })?;
    let coin_token = CoinToken::parse(&row.coin_token)
        .map_err(|err| VoucherPersistenceError::write(format!("stored token invalid: {err}")))?;

    Ok(DigitalCoin {
        id: row.id,
        name: row.name,
        country: row.country,
        state: row.state,
        city: row.city,
        amount,
        generator_phone_number: row.generator_phone_number,
        id_photo_url: row.id_photo_url,
        coin_token,
        created_at: row.created_at,
    })
}

#[async_trait]
impl DigitalCoinRepository for DieselDigitalCoinRepository {
    async fn insert(&self, coin: &NewDigitalCoin) -> Result<(), VoucherPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewDigitalCoinRow {
            id: coin.id,
            name: &coin.name,
            country: &coin.country,
            state: &coin.state,
            city: &coin.city,
            amount: coin.amount.value() as i32,
            generator_phone_number: &coin.generator_phone_number,
            id_photo_url: coin.id_photo_url.as_deref(),
            coin_token: coin.coin_token.as_str(),
        };

        diesel::insert_into(digital_coins::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_latest_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<DigitalCoin>, VoucherPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = digital_coins::table
            .filter(digital_coins::generator_phone_number.eq(phone))
            .order(digital_coins::created_at.desc())
            .select(DigitalCoinRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_coin).transpose()
    }
}

//! PostgreSQL-backed `UserExportRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::account::UserRecord;
use crate::domain::ports::{ExportPersistenceError, UserExportRepository};

use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserExportRepository`] port.
#[derive(Clone)]
pub struct DieselUserExportRepository {
    pool: DbPool,
}

impl DieselUserExportRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExportPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ExportPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ExportPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "export query failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ExportPersistenceError::connection("database connection error")
        }
        other => ExportPersistenceError::query(other.to_string()),
    }
}

fn row_to_record(row: UserRow) -> UserRecord {
    UserRecord {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        city: row.city,
        address: row.address,
        bank: row.bank,
    }
}

#[async_trait]
impl UserExportRepository for DieselUserExportRepository {
    async fn find_by_city_and_bank(
        &self,
        city: &str,
        bank: &str,
    ) -> Result<Vec<UserRecord>, ExportPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = users::table
            .filter(users::city.eq(city))
            .filter(users::bank.eq(bank))
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}

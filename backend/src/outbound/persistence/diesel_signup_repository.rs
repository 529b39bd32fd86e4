//! PostgreSQL-backed `SignupRepository` implementation using Diesel ORM.
//!
//! The user and account inserts run inside a single database transaction so
//! a failure of either write leaves no partial signup behind.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::account::{AccountType, NewUser, SignupRowIds};
use crate::domain::ports::{SignupPersistenceError, SignupRepository};

use super::models::{NewAccountRow, NewUserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, users};

/// Diesel-backed implementation of the [`SignupRepository`] port.
#[derive(Clone)]
pub struct DieselSignupRepository {
    pool: DbPool,
}

impl DieselSignupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SignupPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SignupPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> SignupPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "signup transaction failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SignupPersistenceError::connection("database connection error")
        }
        other => SignupPersistenceError::write(other.to_string()),
    }
}

#[async_trait]
impl SignupRepository for DieselSignupRepository {
    async fn create_user_with_account(
        &self,
        user: &NewUser,
        account_type: AccountType,
    ) -> Result<SignupRowIds, SignupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids = SignupRowIds {
            user_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
        };
        let user_row = NewUserRow {
            id: ids.user_id,
            name: &user.name,
            email: &user.email,
            phone: &user.phone,
            city: &user.city,
            address: &user.address,
            bank: user.bank.as_deref(),
        };
        let account_row = NewAccountRow {
            id: ids.account_id,
            user_id: ids.user_id,
            account_type: account_type.as_str(),
        };

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&user_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(accounts::table)
                    .values(&account_row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(ids)
    }
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, digital_coins, users};

/// Row struct for reading users back for the export workflow.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub bank: Option<String>,
}

/// Insertable struct for creating a user row during signup.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub city: &'a str,
    pub address: &'a str,
    pub bank: Option<&'a str>,
}

/// Insertable struct for creating the account row linked to a new user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_type: &'a str,
}

/// Row struct for reading voucher rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = digital_coins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DigitalCoinRow {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub amount: i32,
    pub generator_phone_number: String,
    pub id_photo_url: Option<String>,
    pub coin_token: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating a voucher row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = digital_coins)]
pub(crate) struct NewDigitalCoinRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub country: &'a str,
    pub state: &'a str,
    pub city: &'a str,
    pub amount: i32,
    pub generator_phone_number: &'a str,
    pub id_photo_url: Option<&'a str>,
    pub coin_token: &'a str,
}

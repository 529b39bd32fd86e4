//! Account-signup aggregates.
//!
//! A signup creates one [`NewUser`] and one linked account row. The account
//! type defaults to savings when the form leaves it unspecified.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account product selected during signup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Standard savings account (the default).
    #[default]
    Savings,
    /// Checking account.
    Checking,
    /// Business account.
    Business,
}

impl AccountType {
    /// Database representation of the account type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Checking => "checking",
            Self::Business => "business",
        }
    }
}

/// User fields persisted by the signup workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Full name as submitted on the form.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number (10 digits).
    pub phone: String,
    /// Selected city.
    pub city: String,
    /// Street address.
    pub address: String,
    /// Partner-bank affiliation tag, when the signup came from a bank page.
    pub bank: Option<String>,
}

/// Identifiers of the rows created by one signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupRowIds {
    /// Primary key of the created user row.
    pub user_id: Uuid,
    /// Primary key of the created account row.
    pub account_id: Uuid,
}

/// A persisted user record as read back for the export workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Primary key.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// City the user signed up from.
    pub city: String,
    /// Street address.
    pub address: String,
    /// Partner-bank affiliation tag, if any.
    pub bank: Option<String>,
}

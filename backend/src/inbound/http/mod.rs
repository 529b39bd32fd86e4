//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod export;
pub mod health;
pub mod locations;
pub mod session;
pub mod signup;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod vouchers;

pub use error::ApiResult;

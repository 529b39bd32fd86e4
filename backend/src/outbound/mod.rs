//! Outbound (driven) adapters: PostgreSQL persistence, the external location
//! and upload APIs, and workbook rendering.

pub mod locations;
pub mod persistence;
pub mod spreadsheet;
pub mod uploads;

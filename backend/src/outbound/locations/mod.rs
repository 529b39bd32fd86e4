//! Location lookup adapter for the external location API.

mod dto;
mod http_source;

pub use http_source::LocationHttpSource;

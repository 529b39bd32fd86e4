//! Photo upload adapter for the external object store API.

mod http_store;

pub use http_store::UploadHttpStore;

//! Data transfer objects for the HTTP API.

pub mod http;
